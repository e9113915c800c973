use std::{
    collections::HashSet,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use entity::{Employee, NewEmployee};
use mockable::{Clock, DefaultClock};
use platform_store::DurableStore;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::ids::{IdGenerator, legacy_id};

/// Durable key mirroring the employee list.
pub const EMPLOYEES_KEY: &str = "employees";

const EVENT_CAPACITY: usize = 64;

/// Owns the employee list and keeps the durable copy in sync.
///
/// The repository is the only writer of both the in-memory list and the
/// `employees` key. Mutations hold the list lock while persisting, so the
/// stored value always matches the list as of the last completed mutation.
pub struct EmployeeRepository {
    store: Arc<dyn DurableStore>,
    clock: Arc<dyn Clock>,
    state: Mutex<State>,
    created: broadcast::Sender<Employee>,
}

#[derive(Default)]
struct State {
    employees: Vec<Employee>,
    ids: IdGenerator,
}

impl EmployeeRepository {
    pub fn load(store: Arc<dyn DurableStore>) -> Self {
        Self::load_with_clock(store, Arc::new(DefaultClock))
    }

    /// Builds the repository from whatever `store` holds under
    /// [`EMPLOYEES_KEY`]. Unreadable data yields an empty list.
    pub fn load_with_clock(store: Arc<dyn DurableStore>, clock: Arc<dyn Clock>) -> Self {
        let employees = match store.read(EMPLOYEES_KEY) {
            None => Vec::new(),
            Some(text) => match decode(&text, clock.utc().timestamp_millis()) {
                Ok(employees) => employees,
                Err(err) => {
                    error!(%err, "could not load employees");
                    Vec::new()
                }
            },
        };
        let mut ids = IdGenerator::default();
        for employee in &employees {
            ids.observe(&employee.id);
        }
        info!(count = employees.len(), "employee repository ready");
        let (created, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            clock,
            state: Mutex::new(State { employees, ids }),
            created,
        }
    }

    /// Appends a new employee with a fresh id and persists the whole list.
    ///
    /// Persistence failures are logged; the in-memory list stays
    /// authoritative and the caller still gets the record.
    pub fn add_employee(&self, payload: NewEmployee) -> Employee {
        let employee = {
            let mut state = self.lock();
            let id = state.ids.next(self.clock.utc().timestamp_millis());
            let employee = Employee::from_new(id, payload);
            state.employees.push(employee.clone());
            self.persist(&state.employees);
            info!(
                employee_id = %employee.id,
                total = state.employees.len(),
                "employee added"
            );
            employee
        };
        if self.created.send(employee.clone()).is_err() {
            debug!(employee_id = %employee.id, "no employee subscribers");
        }
        employee
    }

    /// Snapshot of the list in insertion order.
    pub fn current_collection(&self) -> Vec<Employee> {
        self.lock().employees.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().employees.is_empty()
    }

    /// Receives every employee added after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Employee> {
        self.created.subscribe()
    }

    /// Drops every record and the durable key.
    pub fn clear(&self) {
        let mut state = self.lock();
        let removed = state.employees.len();
        state.employees.clear();
        self.store.remove(EMPLOYEES_KEY);
        info!(removed, "employees cleared");
    }

    fn persist(&self, employees: &[Employee]) {
        let text = match serde_json::to_string(employees) {
            Ok(text) => text,
            Err(err) => {
                error!(%err, "could not save employees");
                return;
            }
        };
        if let Err(err) = self.store.write(EMPLOYEES_KEY, &text) {
            error!(%err, "could not save employees");
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn decode(text: &str, now_millis: i64) -> Result<Vec<Employee>, serde_json::Error> {
    let mut employees: Vec<Employee> = serde_json::from_str(text)?;
    let mut taken: HashSet<String> = employees
        .iter()
        .filter(|employee| employee.has_id())
        .map(|employee| employee.id.clone())
        .collect();
    let mut backfilled = 0usize;
    for (index, employee) in employees.iter_mut().enumerate() {
        if !employee.has_id() {
            employee.id = legacy_id(now_millis, index, &taken);
            taken.insert(employee.id.clone());
            backfilled += 1;
        }
    }
    if backfilled > 0 {
        info!(backfilled, "assigned ids to stored employees");
    }
    Ok(employees)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{DateTime, Duration, Local, Utc};
    use platform_store::{MemoryStore, StoreError, StoreResult};
    use rstest::rstest;

    use super::*;

    /// Clock pinned to a millisecond until moved.
    struct StepClock(Mutex<DateTime<Utc>>);

    impl StepClock {
        fn at(millis: i64) -> Self {
            Self(Mutex::new(
                DateTime::from_timestamp_millis(millis).expect("millis in range"),
            ))
        }

        fn advance(&self, millis: i64) {
            *self.0.lock().expect("clock mutex") += Duration::milliseconds(millis);
        }
    }

    impl Clock for StepClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.0.lock().expect("clock mutex")
        }
    }

    fn payload(first: &str, last: &str) -> NewEmployee {
        NewEmployee {
            first_name: first.into(),
            last_name: last.into(),
            date_of_birth: "1990-01-01".into(),
            start_date: "2023-01-01".into(),
            street: "123 Main St".into(),
            city: "New York".into(),
            state: "New York".into(),
            zip_code: "10001".into(),
            department: "Engineering".into(),
        }
    }

    fn repo_with(store: Arc<MemoryStore>, now: i64) -> EmployeeRepository {
        EmployeeRepository::load_with_clock(store, Arc::new(StepClock::at(now)))
    }

    struct FailingStore;

    impl DurableStore for FailingStore {
        fn read(&self, _key: &str) -> Option<String> {
            None
        }

        fn write(&self, _key: &str, _text: &str) -> StoreResult<()> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }

        fn remove(&self, _key: &str) {}
    }

    #[test]
    fn absent_value_loads_empty() {
        let repo = repo_with(Arc::new(MemoryStore::default()), 1);
        assert!(repo.current_collection().is_empty());
        assert!(repo.is_empty());
    }

    #[rstest]
    #[case("not json")]
    #[case("{\"employees\": []}")]
    #[case("[1, 2]")]
    #[case("")]
    fn unparsable_value_loads_empty(#[case] text: &str) {
        let store = Arc::new(MemoryStore::with_value(EMPLOYEES_KEY, text));
        let repo = repo_with(store, 1);
        assert_eq!(repo.len(), 0);
    }

    #[test]
    fn add_assigns_id_and_writes_through() {
        let store = Arc::new(MemoryStore::default());
        let repo = repo_with(store.clone(), 1_700_000_000_000);

        let created = repo.add_employee(payload("John", "Doe"));

        assert_eq!(created.id, "1700000000000");
        assert_eq!(created.first_name, "John");
        assert_eq!(created.department, "Engineering");
        assert_eq!(repo.current_collection(), vec![created]);
        let written = store.read(EMPLOYEES_KEY).unwrap();
        assert!(written.contains("\"firstName\":\"John\""));
    }

    #[test]
    fn additions_keep_call_order_with_distinct_ids() {
        let repo = repo_with(Arc::new(MemoryStore::default()), 5_000);

        let names = ["Doe", "Smith", "Brown", "Lee"];
        for name in names {
            repo.add_employee(payload("Pat", name));
        }

        let employees = repo.current_collection();
        let order: Vec<_> = employees.iter().map(|e| e.last_name.as_str()).collect();
        assert_eq!(order, names);
        let ids: HashSet<_> = employees.iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids.len(), names.len());
        assert!(employees.iter().all(Employee::has_id));
    }

    #[test]
    fn reload_reproduces_collection() {
        let store = Arc::new(MemoryStore::default());
        let clock = Arc::new(StepClock::at(100));
        let repo = EmployeeRepository::load_with_clock(store.clone(), clock.clone());
        repo.add_employee(payload("John", "Doe"));
        clock.advance(10);
        repo.add_employee(payload("Jane", "Smith"));

        let reloaded = EmployeeRepository::load_with_clock(store, clock);
        assert_eq!(reloaded.current_collection(), repo.current_collection());
    }

    #[test]
    fn ids_after_reload_do_not_collide_with_stored_ones() {
        let store = Arc::new(MemoryStore::default());
        let first = repo_with(store.clone(), 9_000);
        let stored = first.add_employee(payload("John", "Doe"));

        let second = repo_with(store, 9_000);
        let added = second.add_employee(payload("Jane", "Smith"));

        assert_ne!(added.id, stored.id);
        assert_eq!(added.id, "9001");
    }

    #[test]
    fn legacy_records_are_backfilled() {
        let text = r#"[
            {"firstName":"A","lastName":"B"},
            {"id":"keep-me","firstName":"C","lastName":"D"},
            {"id":"","firstName":"E","lastName":"F"}
        ]"#;
        let store = Arc::new(MemoryStore::with_value(EMPLOYEES_KEY, text));
        let repo = repo_with(store, 777);

        let ids: Vec<_> = repo
            .current_collection()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["legacy-777-0", "keep-me", "legacy-777-2"]);
    }

    #[test]
    fn backfill_skips_ids_already_in_the_list() {
        let text = r#"[
            {"id":"legacy-777-1","firstName":"A","lastName":"B"},
            {"firstName":"C","lastName":"D"}
        ]"#;
        let store = Arc::new(MemoryStore::with_value(EMPLOYEES_KEY, text));
        let repo = repo_with(store, 777);

        let ids: Vec<_> = repo
            .current_collection()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["legacy-777-1", "legacy-777-1-1"]);
    }

    #[test]
    fn oversized_stored_id_does_not_freeze_new_ids() {
        let text = r#"[{"id":"18446744073709551615","firstName":"A","lastName":"B"}]"#;
        let store = Arc::new(MemoryStore::with_value(EMPLOYEES_KEY, text));
        let repo = repo_with(store, 50);

        let first = repo.add_employee(payload("John", "Doe"));
        let second = repo.add_employee(payload("Jane", "Smith"));

        assert_eq!(first.id, "50");
        assert_eq!(second.id, "51");
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let repo = EmployeeRepository::load_with_clock(
            Arc::new(FailingStore),
            Arc::new(StepClock::at(1)),
        );
        let created = repo.add_employee(payload("John", "Doe"));
        assert!(created.has_id());
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn clear_removes_records_and_key() {
        let store = Arc::new(MemoryStore::default());
        let repo = repo_with(store.clone(), 1);
        repo.add_employee(payload("John", "Doe"));

        repo.clear();

        assert!(repo.is_empty());
        assert_eq!(store.read(EMPLOYEES_KEY), None);
    }

    #[tokio::test]
    async fn subscribers_see_each_addition() {
        let repo = repo_with(Arc::new(MemoryStore::default()), 1);
        let mut events = repo.subscribe();

        let doe = repo.add_employee(payload("John", "Doe"));
        let smith = repo.add_employee(payload("Jane", "Smith"));

        assert_eq!(events.recv().await.unwrap(), doe);
        assert_eq!(events.recv().await.unwrap(), smith);
    }
}
