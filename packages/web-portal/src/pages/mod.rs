//! Routed pages

mod audit;
mod citizen;
mod dashboard;
mod financial;
mod login;
mod ministries;
mod ministry_detail;
mod not_found;
mod tax_payments;
mod transparency;

pub use audit::*;
pub use citizen::*;
pub use dashboard::*;
pub use financial::*;
pub use login::*;
pub use ministries::*;
pub use ministry_detail::*;
pub use not_found::*;
pub use tax_payments::*;
pub use transparency::*;

const INPUT: &str =
    "w-full px-3 py-2 border border-gray-300 rounded-md text-sm focus:outline-none focus:ring-2 focus:ring-emerald-500";
const LABEL: &str = "block text-sm font-medium text-gray-700 mb-1";
const BUTTON: &str =
    "bg-emerald-700 text-white py-2 px-4 rounded-md text-sm hover:bg-emerald-800 disabled:opacity-50 disabled:cursor-not-allowed";
const PANEL: &str = "bg-white rounded-lg shadow-sm border border-gray-200 p-6";
