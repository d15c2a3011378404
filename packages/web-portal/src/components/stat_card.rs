use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct StatCardProps {
    #[props(into)]
    title: String,
    #[props(into)]
    value: String,
    #[props(into, default)]
    hint: String,
    #[props(default = "emerald")]
    color: &'static str,
}

/// Headline number with a caption
#[component]
pub fn StatCard(props: StatCardProps) -> Element {
    let accent = match props.color {
        "blue" => "border-blue-500",
        "amber" => "border-amber-500",
        "red" => "border-red-500",
        _ => "border-emerald-500",
    };

    rsx! {
        div {
            class: "bg-white rounded-lg shadow-sm border border-gray-200 border-l-4 {accent} p-5",
            p { class: "text-sm text-gray-500", "{props.title}" }
            p { class: "text-2xl font-bold text-gray-900 mt-1", "{props.value}" }
            if !props.hint.is_empty() {
                p { class: "text-xs text-gray-400 mt-1", "{props.hint}" }
            }
        }
    }
}
