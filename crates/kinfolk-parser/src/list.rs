//! Grammar for list-valued cells such as `SpouseID` and `SpouseStatus`.
//!
//! ```text
//! list := item (sep item)*
//! sep  := ',' | ';'
//! item := <any chars except sep>, trimmed
//! ```
//!
//! Empty items are dropped, so `"4; ;7,"` yields `["4", "7"]`.

use winnow::{
    ModalResult, Parser as _,
    combinator::separated,
    token::{one_of, take_while},
};

const SEPARATORS: [char; 2] = [',', ';'];

fn item<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(0.., |c: char| !SEPARATORS.contains(&c))
        .map(str::trim)
        .parse_next(input)
}

fn items<'s>(input: &mut &'s str) -> ModalResult<Vec<&'s str>> {
    separated(1.., item, one_of(SEPARATORS)).parse_next(input)
}

/// Splits a list cell into its non-empty, trimmed items.
pub(crate) fn split_list(cell: &str) -> Vec<String> {
    let mut input = cell;
    match items(&mut input) {
        Ok(values) => values
            .into_iter()
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect(),
        // `item` accepts the empty string, so the grammar cannot fail.
        Err(_) => Vec::new(),
    }
}
