use tokio::sync::watch;

use super::Store;
use crate::api::{ApiClient, Building, Department};
use crate::error::Result;

/// Reference lists used across many screens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consts {
    pub buildings: Vec<Building>,
    pub departments: Vec<Department>,
}

impl Consts {
    #[must_use]
    pub fn building(&self, id: i64) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    #[must_use]
    pub fn department(&self, id: i64) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }
}

/// Shared cache of buildings and departments
///
/// Refetched after any building or department mutation.
#[derive(Debug, Clone, Default)]
pub struct ConstsStore {
    store: Store<Consts>,
}

impl ConstsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self) -> Consts {
        self.store.get()
    }

    pub fn set(&self, consts: Consts) {
        self.store.set(consts);
    }

    /// Fetch both lists and publish them together
    pub async fn refresh(&self, client: &ApiClient) -> Result<()> {
        let (buildings, departments) =
            tokio::try_join!(client.list_buildings(), client.list_departments())?;
        tracing::debug!(
            "Loaded {} buildings and {} departments",
            buildings.len(),
            departments.len()
        );
        self.store.set(Consts {
            buildings,
            departments,
        });
        Ok(())
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Consts> {
        self.store.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let store = ConstsStore::new();
        store.set(Consts {
            buildings: vec![Building {
                id: 2,
                code: "B2".into(),
                name: "Workshop".into(),
            }],
            departments: vec![Department {
                id: 9,
                name: "Facilities".into(),
            }],
        });

        let consts = store.get();
        assert_eq!(consts.building(2).map(|b| b.code.as_str()), Some("B2"));
        assert!(consts.building(3).is_none());
        assert_eq!(consts.department(9).map(|d| d.name.as_str()), Some("Facilities"));
    }
}
