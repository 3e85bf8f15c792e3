use shared::analytics::Trend;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: AttrValue,
    pub value: AttrValue,
    /// `income`, `expense` or `net`
    pub variant: AttrValue,
    /// Period-over-period change in percent
    #[prop_or_default]
    pub change: Option<f64>,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class={classes!("stat-card", props.variant.to_string())}>
            <h3>{&props.title}</h3>
            <div class="stat-value">{&props.value}</div>
            {match props.change {
                Some(change) => html! {
                    <div class={classes!("stat-change", Trend::from_change(change).css_class())}>
                        {shared::analytics::change_indicator(change)}
                    </div>
                },
                None => html! {},
            }}
        </div>
    }
}
