//! # Search and Filtering
//!
//! A single search box finds clients and service orders by whatever the user happens to
//! remember: part of a name, an e-mail, an id, a phone number typed without punctuation.
//!
//! ## Query Normalization
//!
//! [`SearchQuery::parse`] derives two forms from the raw input:
//!
//! - **text**: trimmed and lower-cased, for case-insensitive substring matching.
//! - **digits**: only the ASCII digits, for matching phone numbers and tax ids regardless
//!   of how they were punctuated when stored.
//!
//! A query of `"11999887766"` therefore finds a phone stored as `"(11) 99988-7766"`, and
//! `"silva"` finds `"João Silva"`.
//!
//! ## Matching
//!
//! A record matches when **any** field matches (OR). There is no ranking: results keep the
//! input order. A blank query matches everything. Digit matching is skipped when the query
//! has no digits, otherwise every record would match the empty digit string.
//!
//! | Record | Text fields | Digit fields |
//! |--------|-------------|--------------|
//! | Client | name, email, address, id | phone, cpf |
//! | Service order | client name, type, description, client id, order id | the client's cpf |

use serde::{Deserialize, Serialize};

use crate::model::{Client, OrderStatus, ServiceOrder};
use crate::validation::digits_only;

/// A parsed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    digits: String,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Self {
        Self {
            text: raw.trim().to_lowercase(),
            digits: digits_only(raw),
        }
    }

    /// A blank query matches every record.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    fn matches_text(&self, field: &str) -> bool {
        field.to_lowercase().contains(&self.text)
    }

    fn matches_digits(&self, field: &str) -> bool {
        !self.digits.is_empty() && digits_only(field).contains(&self.digits)
    }

    pub fn matches_client(&self, client: &Client) -> bool {
        if self.is_blank() {
            return true;
        }
        self.matches_text(&client.name)
            || self.matches_text(&client.id)
            || self.matches_text(&client.email)
            || self.matches_text(&client.address)
            || self.matches_digits(&client.phone)
            || self.matches_digits(&client.cpf)
    }
}

/// Clients matching `query`, in their original order.
pub fn search_clients(clients: &[Client], query: &str) -> Vec<Client> {
    let query = SearchQuery::parse(query);
    clients
        .iter()
        .filter(|c| query.matches_client(c))
        .cloned()
        .collect()
}

/// Whether an order matches the query.
///
/// `client` is the order's client if it still exists; it lets users find orders by the
/// client's tax id.
pub fn order_matches(order: &ServiceOrder, query: &SearchQuery, client: Option<&Client>) -> bool {
    if query.is_blank() {
        return true;
    }
    query.matches_text(&order.client_name)
        || query.matches_text(&order.service_type)
        || query.matches_text(&order.description)
        || query.matches_text(&order.client_id)
        || query.matches_text(&order.id)
        || client.is_some_and(|c| query.matches_digits(&c.cpf))
}

/// Restricts a listing to one status, or shows all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl From<OrderStatus> for StatusFilter {
    fn from(status: OrderStatus) -> Self {
        StatusFilter::Only(status)
    }
}

/// Orders matching both the text query and the status filter, in their original order.
pub fn search_orders(
    orders: &[ServiceOrder],
    clients: &[Client],
    query: &str,
    status: StatusFilter,
) -> Vec<ServiceOrder> {
    let query = SearchQuery::parse(query);
    orders
        .iter()
        .filter(|order| status.matches(order.status))
        .filter(|order| {
            let client = clients.iter().find(|c| c.id == order.client_id);
            order_matches(order, &query, client)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use proptest::prelude::*;

    fn client(id: &str, name: &str, phone: &str, cpf: &str) -> Client {
        Client {
            id: id.into(),
            name: name.into(),
            phone: phone.into(),
            email: format!("{}@email.com", name.to_lowercase().replace(' ', ".")),
            cpf: cpf.into(),
            address: "Rua das Flores, 123 - Centro".into(),
            notes: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        }
    }

    fn clients() -> Vec<Client> {
        vec![
            client("847291", "João Silva", "(11) 99999-1234", "123.456.789-00"),
            client("523816", "Maria Oliveira", "(11) 98888-5678", "987.654.321-00"),
            client(
                "164739",
                "Restaurante Bom Sabor",
                "(11) 3333-9999",
                "12.345.678/0001-90",
            ),
        ]
    }

    fn order(id: &str, client: &Client, service_type: &str, status: OrderStatus) -> ServiceOrder {
        ServiceOrder {
            id: id.into(),
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            service_type: service_type.into(),
            description: "Check the condenser and clean filters".into(),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            scheduled_time: None,
            actual_start_time: None,
            actual_end_time: None,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    fn names(found: &[Client]) -> Vec<&str> {
        found.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_blank_query_returns_everything_in_order() {
        let all = clients();
        assert_eq!(search_clients(&all, ""), all);
        assert_eq!(search_clients(&all, "   "), all);
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let found = search_clients(&clients(), "SILVA");
        assert_eq!(names(&found), ["João Silva"]);
        let found = search_clients(&clients(), "  silva ");
        assert_eq!(names(&found), ["João Silva"]);
    }

    #[test]
    fn test_phone_matches_without_punctuation() {
        let found = search_clients(&clients(), "11999991234");
        assert_eq!(names(&found), ["João Silva"]);
        let found = search_clients(&clients(), "3333-9999");
        assert_eq!(names(&found), ["Restaurante Bom Sabor"]);
    }

    #[test]
    fn test_cpf_matches_with_or_without_mask() {
        assert_eq!(
            names(&search_clients(&clients(), "98765432100")),
            ["Maria Oliveira"]
        );
        assert_eq!(
            names(&search_clients(&clients(), "12.345.678/0001")),
            ["Restaurante Bom Sabor"]
        );
    }

    #[test]
    fn test_partial_id_and_email() {
        assert_eq!(names(&search_clients(&clients(), "8472")), ["João Silva"]);
        assert_eq!(
            names(&search_clients(&clients(), "MARIA.OLIVEIRA@")),
            ["Maria Oliveira"]
        );
    }

    #[test]
    fn test_query_without_digits_skips_digit_fields() {
        // "flores" is in every address; "xyz" is nowhere
        assert_eq!(search_clients(&clients(), "flores").len(), 3);
        assert!(search_clients(&clients(), "xyz").is_empty());
    }

    #[test]
    fn test_results_keep_input_order() {
        let found = search_clients(&clients(), "(11)");
        assert_eq!(
            names(&found),
            ["João Silva", "Maria Oliveira", "Restaurante Bom Sabor"]
        );
    }

    #[test]
    fn test_order_search_fields() {
        let cs = clients();
        let orders = vec![
            order("OS-100001", &cs[0], "Installation", OrderStatus::Waiting),
            order("OS-100002", &cs[1], "Cleaning", OrderStatus::Completed),
            order("OS-100003", &cs[2], "Repair", OrderStatus::InProgress),
        ];

        let ids = |found: Vec<ServiceOrder>| -> Vec<String> {
            found.into_iter().map(|o| o.id).collect()
        };

        assert_eq!(
            ids(search_orders(&orders, &cs, "os-100002", StatusFilter::All)),
            ["OS-100002"]
        );
        assert_eq!(
            ids(search_orders(&orders, &cs, "maria", StatusFilter::All)),
            ["OS-100002"]
        );
        assert_eq!(
            ids(search_orders(&orders, &cs, "repair", StatusFilter::All)),
            ["OS-100003"]
        );
        assert_eq!(
            ids(search_orders(&orders, &cs, "164739", StatusFilter::All)),
            ["OS-100003"]
        );
        // client's tax id, typed without punctuation
        assert_eq!(
            ids(search_orders(&orders, &cs, "12345678900", StatusFilter::All)),
            ["OS-100001"]
        );
        assert_eq!(search_orders(&orders, &cs, "", StatusFilter::All).len(), 3);
    }

    #[test]
    fn test_order_search_with_status_filter() {
        let cs = clients();
        let orders = vec![
            order("OS-100001", &cs[0], "Installation", OrderStatus::Waiting),
            order("OS-100002", &cs[1], "Cleaning", OrderStatus::Completed),
            order("OS-100003", &cs[0], "Repair", OrderStatus::Completed),
        ];
        let found = search_orders(&orders, &cs, "silva", OrderStatus::Completed.into());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "OS-100003");

        let found = search_orders(&orders, &cs, "", StatusFilter::Only(OrderStatus::InProgress));
        assert!(found.is_empty());
    }

    #[test]
    fn test_orphaned_order_still_searchable_by_text() {
        let cs = clients();
        let orders = vec![order("OS-100001", &cs[0], "Installation", OrderStatus::Waiting)];
        // Client list no longer contains the order's client
        let found = search_orders(&orders, &[], "joão", StatusFilter::All);
        assert_eq!(found.len(), 1);
        let found = search_orders(&orders, &[], "12345678900", StatusFilter::All);
        assert!(found.is_empty());
    }

    fn phone_mask(digits: &str, style: usize) -> String {
        let (area, rest) = digits.split_at(2);
        let (head, tail) = rest.split_at(rest.len() - 4);
        match style % 3 {
            0 => format!("({}) {}-{}", area, head, tail),
            1 => format!("{} {} {}", area, head, tail),
            _ => digits.to_string(),
        }
    }

    proptest! {
        #[test]
        fn prop_digit_normalized_phones_match(digits in "[0-9]{10,11}", a in 0usize..3, b in 0usize..3) {
            let mut first = client("100000", "Alpha", "", "");
            first.phone = phone_mask(&digits, a);
            let mut second = client("100001", "Beta", "", "");
            second.phone = phone_mask(&digits, b);
            let all = vec![first, second];
            prop_assert_eq!(search_clients(&all, &digits).len(), 2);
        }

        #[test]
        fn prop_results_satisfy_predicate(query in "[a-zA-Z0-9 ().-]{0,8}") {
            let all = clients();
            let found = search_clients(&all, &query);
            let parsed = SearchQuery::parse(&query);
            for c in &found {
                prop_assert!(parsed.matches_client(c));
            }
            let expected: Vec<Client> = all.iter().filter(|c| parsed.matches_client(c)).cloned().collect();
            prop_assert_eq!(found, expected);
        }
    }
}
