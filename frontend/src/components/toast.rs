use uuid::Uuid;
use yew::prelude::*;

use crate::context::ToastKind;

/// A transient status message
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ToastContainerProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<Uuid>,
}

#[function_component(ToastContainer)]
pub fn toast_container(props: &ToastContainerProps) -> Html {
    html! {
        <div class="message-container">
            {for props.toasts.iter().map(|toast| {
                let onclick = {
                    let on_dismiss = props.on_dismiss.clone();
                    let id = toast.id;
                    Callback::from(move |_: MouseEvent| on_dismiss.emit(id))
                };
                html! {
                    <div key={toast.id.to_string()} class={toast.kind.css_class()} {onclick}>
                        {&toast.message}
                    </div>
                }
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_get_distinct_ids() {
        let first = Toast::new(ToastKind::Success, "saved");
        let second = Toast::new(ToastKind::Success, "saved");
        assert_ne!(first.id, second.id);
        assert_eq!(first.message, "saved");
    }
}
