//! Cache key derivation.
//!
//! A key is `namespace:producer:positional:keyword`, where the last two parts
//! are textual renderings of the call arguments supplied by [`CacheArgs`].
//! Rendering goes through `fmt`, so a failing `Debug` or `Display` impl
//! surfaces as an [`fmt::Error`]. A renderer that panics is caught by
//! [`Memoized::call`](super::Memoized::call), which then bypasses the cache.

use std::fmt::{self, Write};

/// Call arguments that can be rendered into a cache key.
///
/// Implementors write their positional arguments and their keyword arguments
/// separately. Two argument values that render identically share a cache
/// entry, so renderings should include every field that affects the result.
pub trait CacheArgs {
    /// Writes the positional arguments, conventionally as a tuple: `(42,)`.
    fn write_positional(&self, out: &mut String) -> fmt::Result;

    /// Writes the keyword arguments, conventionally as a map: `{page: 1}`.
    fn write_keyword(&self, out: &mut String) -> fmt::Result {
        out.write_str("{}")
    }
}

impl CacheArgs for () {
    fn write_positional(&self, out: &mut String) -> fmt::Result {
        out.write_str("()")
    }
}

/// Positional-only arguments rendered with their `Debug` representation.
///
/// ```
/// use courtside::cache::{CacheArgs, Positional};
///
/// let mut out = String::new();
/// Positional((2544,)).write_positional(&mut out).unwrap();
/// assert_eq!(out, "(2544,)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Positional<T>(pub T);

impl<T: fmt::Debug> CacheArgs for Positional<T> {
    fn write_positional(&self, out: &mut String) -> fmt::Result {
        write!(out, "{:?}", self.0)
    }
}

/// Derives the cache key for one call.
///
/// # Errors
///
/// Propagates the [`fmt::Error`] of a failing argument rendering.
///
/// ```
/// use courtside::cache::{derive_key, Positional};
///
/// let key = derive_key("", "get_player_by_id", &Positional((2544,))).unwrap();
/// assert_eq!(key, ":get_player_by_id:(2544,):{}");
/// ```
pub fn derive_key<A>(namespace: &str, producer: &str, args: &A) -> Result<String, fmt::Error>
where
    A: CacheArgs + ?Sized,
{
    let mut key = String::with_capacity(namespace.len() + producer.len() + 16);
    key.push_str(namespace);
    key.push(':');
    key.push_str(producer);
    key.push(':');
    args.write_positional(&mut key)?;
    key.push(':');
    args.write_keyword(&mut key)?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Paging {
        page: u32,
        per_page: u32,
    }

    impl CacheArgs for Paging {
        fn write_positional(&self, out: &mut String) -> fmt::Result {
            out.write_str("()")
        }

        fn write_keyword(&self, out: &mut String) -> fmt::Result {
            write!(out, "{{page: {}, per_page: {}}}", self.page, self.per_page)
        }
    }

    struct Broken;

    impl fmt::Debug for Broken {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn unit_args() {
        assert_eq!(derive_key("", "get_teams", &()).unwrap(), ":get_teams:():{}");
    }

    #[test]
    fn namespace_prefix() {
        assert_eq!(
            derive_key("v2", "get_teams", &()).unwrap(),
            "v2:get_teams:():{}"
        );
    }

    #[test]
    fn keyword_args() {
        let key = derive_key("", "get_all_players", &Paging { page: 2, per_page: 10 }).unwrap();
        assert_eq!(key, ":get_all_players:():{page: 2, per_page: 10}");
    }

    #[test]
    fn identical_args_identical_keys() {
        let a = derive_key("", "f", &Positional(("x", 1))).unwrap();
        let b = derive_key("", "f", &Positional(("x", 1))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_args_distinct_keys() {
        let a = derive_key("", "f", &Positional((1,))).unwrap();
        let b = derive_key("", "f", &Positional((2,))).unwrap();
        assert_ne!(a, b);

        let c = derive_key("", "f", &Paging { page: 1, per_page: 10 }).unwrap();
        let d = derive_key("", "f", &Paging { page: 1, per_page: 20 }).unwrap();
        assert_ne!(c, d);
    }

    #[test]
    fn producer_name_disambiguates() {
        let a = derive_key("", "get_player_by_id", &Positional((1,))).unwrap();
        let b = derive_key("", "get_players_by_team", &Positional((1,))).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn failing_render_is_an_error() {
        assert!(derive_key("", "f", &Positional(Broken)).is_err());
    }
}
