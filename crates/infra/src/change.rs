use crate::route::Route;

/// Signal published once per mutating store call that changed something.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    /// What changed: one record, or potentially the whole collection.
    pub scope: Route,
}

impl ChangeNotice {
    pub fn collection() -> Self {
        Self {
            scope: Route::Collection,
        }
    }

    pub fn item(id: carshop_core::CarId) -> Self {
        Self {
            scope: Route::Item(id),
        }
    }

    /// Whether a view bound to `route` should re-read after this notice.
    ///
    /// A collection-wide change affects every route. A single-record change
    /// affects the collection and that record only.
    pub fn affects(&self, route: &Route) -> bool {
        match (self.scope, route) {
            (Route::Collection, _) => true,
            (Route::Item(_), Route::Collection) => true,
            (Route::Item(changed), Route::Item(watched)) => changed == *watched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carshop_core::CarId;

    #[test]
    fn collection_notice_affects_everything() {
        let notice = ChangeNotice::collection();
        assert!(notice.affects(&Route::Collection));
        assert!(notice.affects(&Route::Item(CarId::new(4))));
    }

    #[test]
    fn item_notice_affects_collection_and_same_item() {
        let notice = ChangeNotice::item(CarId::new(4));
        assert!(notice.affects(&Route::Collection));
        assert!(notice.affects(&Route::Item(CarId::new(4))));
        assert!(!notice.affects(&Route::Item(CarId::new(5))));
    }
}
