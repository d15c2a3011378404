//! Reusable UI components

mod layout;
mod loading;
mod notice;
mod redirect;
mod sidebar;
mod stat_card;

pub use layout::*;
pub use loading::*;
pub use notice::*;
pub use redirect::*;
pub use sidebar::*;
pub use stat_card::*;
