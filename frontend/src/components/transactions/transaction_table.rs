use shared::format;
use shared::Transaction;
use yew::prelude::*;

use crate::context::AppContext;

#[derive(Properties, PartialEq)]
pub struct TransactionTableProps {
    pub transactions: Vec<Transaction>,
    pub loading: bool,
}

#[function_component(TransactionTable)]
pub fn transaction_table(props: &TransactionTableProps) -> Html {
    let ctx = use_context::<AppContext>().expect("AppContext not found");

    if props.loading {
        return html! { <div class="loading">{ctx.t("common.loading")}</div> };
    }
    if props.transactions.is_empty() {
        return html! { <div class="empty-state">{ctx.t("transactions.empty")}</div> };
    }

    html! {
        <div class="table-container">
            <table class="transactions-table">
                <thead>
                    <tr>
                        <th>{ctx.t("transaction.date")}</th>
                        <th>{ctx.t("transaction.type")}</th>
                        <th>{ctx.t("transaction.category")}</th>
                        <th>{ctx.t("transaction.description")}</th>
                        <th>{ctx.t("transaction.amount")}</th>
                    </tr>
                </thead>
                <tbody>
                    {for props.transactions.iter().map(|transaction| {
                        let kind = transaction.transaction_type;
                        html! {
                            <tr key={transaction.id.to_string()} class={classes!("transaction-item", kind.as_str())}>
                                <td class="date">{transaction.date.format("%Y-%m-%d").to_string()}</td>
                                <td class="type">{ctx.t(kind.label_key())}</td>
                                <td class="category">{transaction.category_name()}</td>
                                <td class="description">{transaction.description_text()}</td>
                                <td class={classes!("amount", kind.as_str())}>
                                    {format::signed_amount(kind, transaction.amount)}
                                </td>
                            </tr>
                        }
                    })}
                </tbody>
            </table>
        </div>
    }
}
