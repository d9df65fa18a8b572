//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives every client
//! operation over real HTTP through the bundled `UreqTransport`. Validates
//! that request building and response unwrapping agree with an actual server.

use flapjack_diner::{Config, Diner, DinerError, Options};
use time::macros::datetime;

/// Start a fresh mock server on a random port and return a client for it.
fn start_server() -> Diner {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    Diner::new(Config::new(format!("http://{addr}")))
}

#[test]
fn read_operations() {
    let diner = start_server();

    let entities = diner.entities().unwrap().unwrap();
    assert_eq!(entities[0]["name"], "web01");

    let checks = diner.checks("web01").unwrap().unwrap();
    assert_eq!(checks, serde_json::json!(["PING", "HTTP"]));

    let status = diner.status("web01", None).unwrap().unwrap();
    assert_eq!(status.as_array().unwrap().len(), 2);

    let status = diner.status("web01", Some("HTTP")).unwrap().unwrap();
    assert_eq!(status["state"], "critical");

    let contacts = diner.contacts().unwrap().unwrap();
    assert_eq!(contacts[0]["first_name"], "Ada");
}

#[test]
fn outages_and_downtime_send_the_time_window() {
    let diner = start_server();
    let options = Options::new()
        .with("start_time", datetime!(2013-02-01 00:00:00 UTC))
        .with("end_time", datetime!(2013-02-02 12:30:00 +01:00));

    let outages = diner.outages("web01", Some("PING"), options.clone()).unwrap().unwrap();
    assert_eq!(outages["start_time"], "2013-02-01T00:00:00Z");
    assert_eq!(outages["end_time"], "2013-02-02T12:30:00+01:00");
    assert_eq!(outages["check"], "PING");

    let downtime = diner.downtime("db01", None, options).unwrap().unwrap();
    assert_eq!(downtime["entity"], "db01");
    assert!(downtime["check"].is_null());
}

#[test]
fn acknowledge_creates_unscheduled_maintenance() {
    let diner = start_server();

    let options = Options::new()
        .with("summary", "looking into it")
        .with("duration", 1800);
    assert!(diner.acknowledge("web01", "HTTP", options).unwrap());

    let unscheduled = diner
        .unscheduled_maintenances("web01", Some("HTTP"), Options::new())
        .unwrap()
        .unwrap();
    assert_eq!(unscheduled[0]["summary"], "looking into it");
    assert_eq!(unscheduled[0]["duration"], 1800);

    let status = diner.status("web01", Some("HTTP")).unwrap().unwrap();
    assert_eq!(status["summary"], "looking into it");
}

#[test]
fn failed_writes_are_false() {
    let diner = start_server();

    // Unknown check: the server answers 404.
    assert!(!diner.acknowledge("web01", "DISK", Options::new()).unwrap());
    assert!(!diner.test_notifications("nope", "PING", Options::new()).unwrap());
    assert!(!diner.contact_set_timezone("99", "UTC").unwrap());
}

#[test]
fn test_notifications_succeed() {
    let diner = start_server();

    assert!(diner.test_notifications("db01", "PING", Options::new()).unwrap());
    let status = diner.status("db01", Some("PING")).unwrap().unwrap();
    assert_eq!(status["notifications_tested"], 1);
}

#[test]
fn scheduled_maintenance_lifecycle() {
    let diner = start_server();
    let start = datetime!(2013-03-01 09:00:00 UTC);

    // Step 1: create.
    let options = Options::new()
        .with("start_time", start)
        .with("duration", 7200)
        .with("summary", "rack move");
    assert!(diner.create_scheduled_maintenance("web01", "PING", options).unwrap());

    // Step 2: list for the entity and for the check.
    let all = diner
        .scheduled_maintenances("web01", None, Options::new())
        .unwrap()
        .unwrap();
    assert_eq!(all.as_array().unwrap().len(), 1);
    assert_eq!(all[0]["start_time"], "2013-03-01T09:00:00Z");
    assert_eq!(all[0]["duration"], 7200);

    let other = diner
        .scheduled_maintenances("web01", Some("HTTP"), Options::new())
        .unwrap()
        .unwrap();
    assert!(other.as_array().unwrap().is_empty());

    // Step 3: delete, then delete again.
    assert!(diner.delete_scheduled_maintenance("web01", "PING", start).unwrap());
    assert!(!diner.delete_scheduled_maintenance("web01", "PING", start).unwrap());

    // Step 4: list is empty again.
    let all = diner
        .scheduled_maintenances("web01", None, Options::new())
        .unwrap()
        .unwrap();
    assert!(all.as_array().unwrap().is_empty());
}

#[test]
fn scheduled_maintenance_with_bad_duration_never_reaches_the_server() {
    let diner = start_server();

    let options = Options::new()
        .with("start_time", datetime!(2013-03-01 09:00:00 UTC))
        .with("duration", "two hours");
    let err = diner
        .create_scheduled_maintenance("web01", "PING", options)
        .unwrap_err();
    assert!(matches!(err, DinerError::Validation(_)));

    let all = diner
        .scheduled_maintenances("web01", None, Options::new())
        .unwrap()
        .unwrap();
    assert!(all.as_array().unwrap().is_empty());
}

#[test]
fn contact_timezone_round_trip() {
    let diner = start_server();

    let tz = diner.contact_timezone("21").unwrap().unwrap();
    assert_eq!(tz["timezone"], "Europe/London");

    assert!(diner.contact_set_timezone("21", "Australia/Perth").unwrap());

    let tz = diner.contact_timezone("21").unwrap().unwrap();
    assert_eq!(tz["timezone"], "Australia/Perth");
}

#[test]
fn create_contacts_then_list() {
    let diner = start_server();

    let created = diner
        .create_contacts(&[serde_json::json!({
            "id": "42",
            "first_name": "Grace",
            "last_name": "Hopper",
            "timezone": "America/New_York",
        })])
        .unwrap();
    assert!(created);

    let contacts = diner.contacts().unwrap().unwrap();
    assert_eq!(contacts.as_array().unwrap().len(), 2);
    let tz = diner.contact_timezone("42").unwrap().unwrap();
    assert_eq!(tz["timezone"], "America/New_York");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind and drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let diner = Diner::new(Config::new(format!("http://{addr}")));

    assert!(matches!(diner.entities().unwrap_err(), DinerError::Transport(_)));
    assert!(matches!(
        diner.acknowledge("web01", "PING", Options::new()).unwrap_err(),
        DinerError::Transport(_)
    ));
}
