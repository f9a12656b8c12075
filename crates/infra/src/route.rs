//! Request addressing: collection vs single record.
//!
//! Paths look like `cars` or `cars/<id>`, optionally prefixed with
//! `content://<authority>/`. Each store owns one [`Router`], built once and
//! never modified.

use carshop_core::CarId;

use crate::error::{StoreError, StoreResult};

/// Authority part of fully-qualified addresses.
pub const AUTHORITY: &str = "com.edmilson.inventoryapp";

/// Path segment of the cars collection.
pub const PATH_CARS: &str = "cars";

/// A resolved address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// All records.
    Collection,
    /// One record by id.
    Item(CarId),
}

impl Route {
    /// MIME type of the data behind this route.
    pub fn content_type(&self) -> &'static str {
        match self {
            Route::Collection => "vnd.android.cursor.dir/com.edmilson.inventoryapp/cars",
            Route::Item(_) => "vnd.android.cursor.item/com.edmilson.inventoryapp/cars",
        }
    }

    /// Fully-qualified `content://` address.
    pub fn uri(&self) -> String {
        format!("content://{AUTHORITY}/{self}")
    }
}

impl core::fmt::Display for Route {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Route::Collection => f.write_str(PATH_CARS),
            Route::Item(id) => write!(f, "{PATH_CARS}/{id}"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum RouteKind {
    Collection,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    /// Matches a run of ASCII digits.
    Number,
}

#[derive(Debug, Clone)]
struct Pattern {
    segments: Vec<Segment>,
    kind: RouteKind,
}

/// Path-pattern table mapping request paths to [`Route`]s.
#[derive(Debug, Clone)]
pub struct Router {
    patterns: Vec<Pattern>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            patterns: vec![
                Pattern {
                    segments: vec![Segment::Literal(PATH_CARS)],
                    kind: RouteKind::Collection,
                },
                Pattern {
                    segments: vec![Segment::Literal(PATH_CARS), Segment::Number],
                    kind: RouteKind::Item,
                },
            ],
        }
    }

    /// Resolve `path` to a route, or fail with `UnknownRoute`.
    pub fn resolve(&self, path: &str) -> StoreResult<Route> {
        let unknown = || StoreError::UnknownRoute(path.to_string());

        let relative = match path.strip_prefix("content://") {
            Some(rest) => rest
                .strip_prefix(AUTHORITY)
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                .ok_or_else(unknown)?,
            None => path,
        };

        let parts: Vec<&str> = relative.trim_matches('/').split('/').collect();

        for pattern in &self.patterns {
            if let Some(route) = pattern.matches(&parts) {
                return Ok(route);
            }
        }

        Err(unknown())
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Pattern {
    fn matches(&self, parts: &[&str]) -> Option<Route> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut id = None;
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Number => {
                    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                        return None;
                    }
                    id = Some(CarId::new(part.parse::<i64>().ok()?));
                }
            }
        }

        match (self.kind, id) {
            (RouteKind::Collection, _) => Some(Route::Collection),
            (RouteKind::Item, Some(id)) => Some(Route::Item(id)),
            (RouteKind::Item, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_collection_and_item_paths() {
        let router = Router::new();
        assert_eq!(router.resolve("cars").unwrap(), Route::Collection);
        assert_eq!(router.resolve("/cars/").unwrap(), Route::Collection);
        assert_eq!(router.resolve("cars/7").unwrap(), Route::Item(CarId::new(7)));
    }

    #[test]
    fn resolves_fully_qualified_uris() {
        let router = Router::new();
        let route = router
            .resolve("content://com.edmilson.inventoryapp/cars/12")
            .unwrap();
        assert_eq!(route, Route::Item(CarId::new(12)));
        assert_eq!(route.uri(), "content://com.edmilson.inventoryapp/cars/12");
    }

    #[test]
    fn rejects_unknown_paths() {
        let router = Router::new();
        for path in [
            "",
            "staff",
            "cars/abc",
            "cars/-1",
            "cars/1/2",
            "cars/99999999999999999999",
            "content://other.authority/cars",
            "content://com.edmilson.inventoryappx/cars",
        ] {
            assert!(
                matches!(router.resolve(path), Err(StoreError::UnknownRoute(_))),
                "expected {path:?} to be rejected"
            );
        }
    }

    #[test]
    fn content_types_differ_by_kind() {
        assert!(Route::Collection.content_type().starts_with("vnd.android.cursor.dir/"));
        assert!(
            Route::Item(CarId::new(1))
                .content_type()
                .starts_with("vnd.android.cursor.item/")
        );
    }
}
