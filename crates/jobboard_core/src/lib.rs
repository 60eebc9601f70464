//! Jobboard core: pure navigation state machine and link-interception rules.
mod click;
mod config;
mod effect;
mod history;
mod msg;
mod navigation;
mod path;
mod state;
mod update;
mod view_model;

pub use click::{classify_click, Anchor, ClickDecision, ClickEvent, IgnoreReason, Modifiers};
pub use config::{RouterConfig, CONTENT_SELECTOR, TRANSITION_CLASS};
pub use effect::Effect;
pub use history::{popstate_target, HistoryState};
pub use msg::Msg;
pub use navigation::{LoadedPage, NavigationFailure, NavigationRequest};
pub use path::{
    is_page_path, normalize_path, normalize_path_with, strip_query, DEFAULT_PAGE, PAGE_EXTENSION,
};
pub use state::{ActiveNavigation, NavPhase, NavTicket, RouterState};
pub use update::update;
pub use view_model::RouterView;
