use crate::domain::model::{NumberSet, TicketMatchResult};
use std::collections::HashSet;

/// 比對每一注與開獎號碼。
///
/// 任一輸入缺少時回傳空陣列。結果順序與 `tickets` 相同；
/// 同一注內重複的號碼不會去重，命中時會重複計算。
pub fn compute_matches(
    drawn: Option<&NumberSet>,
    tickets: Option<&[NumberSet]>,
) -> Vec<TicketMatchResult> {
    let (Some(drawn), Some(tickets)) = (drawn, tickets) else {
        return Vec::new();
    };

    let drawn: HashSet<String> = drawn.normalized().into_iter().collect();

    tickets
        .iter()
        .map(|ticket| {
            let numbers = ticket.normalized();
            let matched: Vec<String> = numbers
                .iter()
                .filter(|number| drawn.contains(number.as_str()))
                .cloned()
                .collect();

            TicketMatchResult {
                hits: matched.len(),
                numbers,
                matched,
            }
        })
        .collect()
}
