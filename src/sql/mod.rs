pub mod literal;
pub use literal::*;

pub mod operators;
pub use operators::*;

pub mod aggregate_call;
pub use aggregate_call::*;

pub mod sql_expr;
pub use sql_expr::*;

pub mod ordering;
pub use ordering::*;

pub mod table_source;
pub use table_source::*;

pub mod join;
pub use join::*;

pub mod statement;
pub use statement::*;

/// First name of the sequence `prefix`, `prefix1`, `prefix2`, ... that is not taken.
pub fn unique_name(prefix: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(prefix) {
        return prefix.to_string();
    }
    let mut k = 1usize;
    loop {
        let name = format!("{}{}", prefix, k);
        if !is_taken(&name) {
            return name;
        }
        k += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::unique_name;

    #[test]
    fn unique_name_skips_taken_candidates() {
        let taken = ["T", "T1"];
        assert_eq!(unique_name("T", |n| taken.contains(&n)), "T2");
        assert_eq!(unique_name("C", |n| taken.contains(&n)), "C");
    }
}
