use shared::{Pagination, SortField, Transaction, TransactionQuery, TransactionType};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::context::AppContext;

#[derive(Clone)]
pub struct TransactionState {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
    pub query: TransactionQuery,
    pub loading: bool,
}

pub struct UseTransactionsResult {
    pub state: TransactionState,
    pub actions: UseTransactionsActions,
}

#[derive(Clone)]
pub struct UseTransactionsActions {
    pub refresh_transactions: Callback<()>,
    pub on_type_filter_change: Callback<Event>,
    pub on_sort_change: Callback<Event>,
    pub toggle_sort_order: Callback<()>,
    pub previous_page: Callback<()>,
    pub next_page: Callback<()>,
}

/// Paged, filtered and sorted transaction list.
///
/// Any change to the query refetches; filter and sort changes go back to
/// the first page.
#[hook]
pub fn use_transactions(initial: TransactionQuery) -> UseTransactionsResult {
    let ctx = use_context::<AppContext>().expect("AppContext not found");
    let transactions = use_state(Vec::<Transaction>::new);
    let pagination = use_state(Pagination::default);
    let query = use_state(move || initial);
    let loading = use_state(|| true);
    // bumped to refetch with an unchanged query
    let reload = use_state(|| 0u32);

    {
        let ctx = ctx.clone();
        let transactions = transactions.clone();
        let pagination = pagination.clone();
        let loading = loading.clone();
        use_effect_with(((*query).clone(), *reload), move |(query, _)| {
            let query = query.clone();
            let ticket = ctx.ticket();
            loading.set(true);

            spawn_local(async move {
                let result = ctx.api.transactions(&query).await;
                if !ctx.is_current(&ticket) {
                    return;
                }
                match result {
                    Ok(data) => {
                        transactions.set(data.transactions);
                        pagination.set(data.pagination);
                    }
                    Err(e) => ctx.report_error(&e, "messages.load_failed"),
                }
                loading.set(false);
            });
            || ()
        });
    }

    let refresh_transactions = use_callback(reload.clone(), |_: (), reload| {
        reload.set(**reload + 1);
    });

    let on_type_filter_change = use_callback(query.clone(), |e: Event, query| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        let transaction_type = select.value().parse::<TransactionType>().ok();
        query.set(TransactionQuery {
            transaction_type,
            page: 1,
            ..(**query).clone()
        });
    });

    let on_sort_change = use_callback(query.clone(), |e: Event, query| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        if let Some(sort_by) = SortField::parse(&select.value()) {
            query.set(TransactionQuery {
                sort_by,
                page: 1,
                ..(**query).clone()
            });
        }
    });

    let toggle_sort_order = use_callback(query.clone(), |_: (), query| {
        query.set(TransactionQuery {
            sort_order: query.sort_order.toggled(),
            page: 1,
            ..(**query).clone()
        });
    });

    let previous_page = use_callback(
        (query.clone(), pagination.clone()),
        |_: (), (query, pagination)| {
            if pagination.has_prev && query.page > 1 {
                query.set(TransactionQuery {
                    page: query.page - 1,
                    ..(**query).clone()
                });
            }
        },
    );

    let next_page = use_callback(
        (query.clone(), pagination.clone()),
        |_: (), (query, pagination)| {
            if pagination.has_next {
                query.set(TransactionQuery {
                    page: query.page + 1,
                    ..(**query).clone()
                });
            }
        },
    );

    let state = TransactionState {
        transactions: (*transactions).clone(),
        pagination: (*pagination).clone(),
        query: (*query).clone(),
        loading: *loading,
    };

    let actions = UseTransactionsActions {
        refresh_transactions,
        on_type_filter_change,
        on_sort_change,
        toggle_sort_order,
        previous_page,
        next_page,
    };

    UseTransactionsResult { state, actions }
}
