use web_time::Duration;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(in crate::app) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Helper component to attatch the contents into the document.body instead of in the place where it's used.
#[function_component]
pub(in crate::app) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Formats a clock reading as `M:SS`, rounding down to whole seconds.
pub(in crate::app) fn format_clock(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
