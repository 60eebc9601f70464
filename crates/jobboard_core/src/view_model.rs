use crate::NavPhase;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouterView {
    pub phase: NavPhase,
    pub current_route: Option<String>,
}
