use staffdir_core::db::open_db_in_memory;
use staffdir_core::{
    ActorContext, Clock, EmployeePageQuery, EmployeeService, NewEmployee,
    SqliteEmployeeRepository, PASSWORD_MASK,
};
use std::sync::atomic::{AtomicI64, Ordering};

struct StepClock(AtomicI64);

impl Clock for StepClock {
    fn now_epoch_ms(&self) -> i64 {
        self.0.fetch_add(1_000, Ordering::SeqCst)
    }
}

fn profile(username: &str, name: &str) -> NewEmployee {
    NewEmployee {
        username: username.to_string(),
        name: name.to_string(),
        phone: "13800000001".to_string(),
        sex: "1".to_string(),
        id_number: "11010119900307001X".to_string(),
    }
}

fn page(name: Option<&str>, page: u32, page_size: u32) -> EmployeePageQuery {
    EmployeePageQuery {
        name: name.map(str::to_string),
        page,
        page_size,
    }
}

#[test]
fn first_page_of_twenty_five_returns_total_and_newest_ten() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap())
        .with_clock(StepClock(AtomicI64::new(1_000)));
    for i in 0..25 {
        service
            .create(
                profile(&format!("emp_{i:02}"), &format!("Employee {i}")),
                &ActorContext::new(1),
            )
            .unwrap();
    }

    let result = service.query(&page(None, 1, 10)).unwrap();
    assert_eq!(result.total, 25);
    assert_eq!(result.records.len(), 10);
    assert_eq!(result.records[0].username, "emp_24");
    assert_eq!(result.records[9].username, "emp_15");
    assert!(result
        .records
        .windows(2)
        .all(|pair| pair[0].create_time > pair[1].create_time));

    let last = service.query(&page(None, 3, 10)).unwrap();
    assert_eq!(last.total, 25);
    assert_eq!(last.records.len(), 5);
    assert_eq!(last.records[4].username, "emp_00");

    let beyond = service.query(&page(None, 4, 10)).unwrap();
    assert_eq!(beyond.total, 25);
    assert!(beyond.records.is_empty());
}

#[test]
fn equal_create_times_fall_back_to_newest_id_first() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let first = service.create(profile("first", "First"), &ActorContext::new(1)).unwrap();
    let second = service.create(profile("second", "Second"), &ActorContext::new(1)).unwrap();
    conn.execute("UPDATE employee SET create_time = 1000, update_time = 1000;", [])
        .unwrap();

    let result = service.query(&page(None, 1, 10)).unwrap();
    let ids: Vec<_> = result.records.iter().map(|employee| employee.id).collect();
    assert_eq!(ids, vec![second, first]);
}

#[test]
fn name_filter_is_case_insensitive_substring() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    let actor = ActorContext::new(1);
    service.create(profile("zhangwei", "Zhang Wei"), &actor).unwrap();
    service.create(profile("zhangsan", "zhang san"), &actor).unwrap();
    service.create(profile("lisi", "Li Si"), &actor).unwrap();

    let result = service.query(&page(Some("ZHANG"), 1, 10)).unwrap();
    assert_eq!(result.total, 2);
    assert!(result
        .records
        .iter()
        .all(|employee| employee.name.to_lowercase().contains("zhang")));

    let all = service.query(&page(Some("  "), 1, 10)).unwrap();
    assert_eq!(all.total, 3);
}

#[test]
fn name_filter_treats_like_wildcards_literally() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    service
        .create(profile("zhangwei", "Zhang Wei"), &ActorContext::new(1))
        .unwrap();

    assert_eq!(service.query(&page(Some("%"), 1, 10)).unwrap().total, 0);
    assert_eq!(service.query(&page(Some("_"), 1, 10)).unwrap().total, 0);
}

#[test]
fn listed_records_are_redacted() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    service
        .create(profile("zhangwei", "Zhang Wei"), &ActorContext::new(1))
        .unwrap();

    let result = service.query(&page(None, 1, 10)).unwrap();
    assert_eq!(result.records[0].password, PASSWORD_MASK);
}

#[test]
fn page_size_defaults_and_clamps_to_config() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
    for i in 0..60 {
        service
            .create(
                profile(&format!("emp_{i:02}"), &format!("Employee {i}")),
                &ActorContext::new(1),
            )
            .unwrap();
    }

    let defaulted = service.query(&page(None, 1, 0)).unwrap();
    assert_eq!(defaulted.records.len(), 10);

    let clamped = service.query(&page(None, 1, 500)).unwrap();
    assert_eq!(clamped.total, 60);
    assert_eq!(clamped.records.len(), service.config().max_page_size as usize);
}
