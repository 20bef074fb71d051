#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).unwrap());
        &*RE
    }};
}

#[macro_export]
macro_rules! re {
    ($pat:literal) => {
        $crate::Pattern::Regex($crate::regex!($pat))
    };
}

/// Build a comma-group rule: the gate regex must match the whole line, then
/// the line is split on `$on` and every group is fed back through the table.
#[macro_export]
macro_rules! split {
    ($pat:literal, $on:literal) => {
        $crate::Pattern::Split { gate: $crate::regex!($pat), on: $on }
    };
}

#[macro_export]
macro_rules! rule {
    (
        name: $name:expr,
        pattern: $pat:expr
        $(, buckets: $buckets:expr)?
        , prod: |$groups_ident:ident : &Groups| -> $ret_ty:ty $body_expr:block
        $(,)?
    ) => {{
        $crate::Rule {
            name: $name,
            pattern: $pat,
            production: Box::new(move |$groups_ident: &$crate::Groups| {
                let result: $ret_ty = $body_expr;
                result
            }),
            buckets: { 0 $(| $buckets)? },
        }
    }};
    (
        name: $name:expr,
        pattern: $pat:expr
        $(, buckets: $buckets:expr)?
        $(,)?
    ) => {{
        $crate::Rule {
            name: $name,
            pattern: $pat,
            production: Box::new(|_: &$crate::Groups| -> Option<Vec<$crate::RawBooking>> { None }),
            buckets: { 0 $(| $buckets)? },
        }
    }};
}
