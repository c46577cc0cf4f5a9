use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE: &str = "http://127.0.0.1:9";

fn cmd() -> Command {
    let mut c = Command::new(assert_cmd::cargo_bin!("flightdesk"));
    c.env_remove("FLIGHTS_API_BASE")
        .env_remove("FLIGHTS_API_ZONE")
        .env_remove("RUST_LOG");
    c
}

#[test]
fn top_level_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Search flights and manage records on the booking API",
        ))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("Examples:"))
        .stdout(predicate::str::contains("flightdesk search -f AMS -t JFK"));
}

#[test]
fn top_level_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("flightdesk 0.1.0"));
}

#[test]
fn search_help_shows_all_flags() {
    cmd()
        .args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-f, --from <CODE>"))
        .stdout(predicate::str::contains("-t, --to <CODE>"))
        .stdout(predicate::str::contains("-d, --date <YYYY-MM-DD>"))
        .stdout(predicate::str::contains("--time <HH:MM>"))
        .stdout(predicate::str::contains("--datetime <DATETIME>"))
        .stdout(predicate::str::contains("--top <N>"))
        .stdout(predicate::str::contains("--compact"))
        .stdout(predicate::str::contains("--api-base <URL>"))
        .stdout(predicate::str::contains("FLIGHTS_API_BASE"))
        .stdout(predicate::str::contains("[default: 00:00]"))
        .stdout(predicate::str::contains("Multi-dest:"));
}

#[test]
fn missing_api_base_fails() {
    cmd()
        .args(["search", "-f", "AMS", "-t", "JFK", "-d", "2025-08-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("base URL is empty"));
}

#[test]
fn missing_route_args_fail_locally() {
    cmd()
        .args(["--api-base", UNREACHABLE, "search", "-t", "JFK", "-d", "2025-08-01"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing required parameters"));
}

#[test]
fn missing_date_fails_locally() {
    cmd()
        .args(["--api-base", UNREACHABLE, "search", "-f", "AMS", "-t", "JFK"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing required parameters"));
}

#[test]
fn json_mode_reports_error_kind() {
    cmd()
        .args(["--api-base", UNREACHABLE, "--json", "search", "-f", "AMS"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(r#""kind":"missing_parameters""#))
        .stdout(predicate::str::contains("Missing required parameters"));
}

#[test]
fn datetime_conflicts_with_date() {
    cmd()
        .args([
            "search",
            "-f",
            "AMS",
            "-t",
            "JFK",
            "-d",
            "2025-08-01",
            "--datetime",
            "2025-08-01T10:00:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn unreachable_backend_is_a_transport_error() {
    cmd()
        .args(["--api-base", UNREACHABLE, "get", "customers"])
        .assert()
        .code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn search_prints_json_itineraries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .and(query_param("departure", "AMS"))
        .and(query_param("arrival", "JFK"))
        .and(query_param("datetime", "2025-08-01T14:30:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            {"flightNumber": 1, "flightDeparture": "AMS", "flightDestination": "LHR",
             "departureTime": "2025-08-01T15:00:00", "arrivalTime": "2025-08-01T16:00:00"},
            {"flightNumber": 2, "flightDeparture": "LHR", "flightDestination": "JFK",
             "departureTime": "2025-08-01T16:45:00", "arrivalTime": "2025-08-02T00:45:00"}
        ]])))
        .expect(1)
        .mount(&server)
        .await;

    cmd()
        .args([
            "--api-base",
            &server.uri(),
            "--json",
            "search",
            "-f",
            "AMS",
            "-t",
            "JFK",
            "-d",
            "2025-08-01",
            "--time",
            "14:30",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""totalTransfers":1"#))
        .stdout(predicate::str::contains(r#""transfers":["0 hours 45 minutes"]"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn compact_search_prints_route() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
            {"flightNumber": "KL641", "flightDeparture": "AMS", "flightDestination": "JFK",
             "departureTime": "2025-08-01T10:00:00", "arrivalTime": "2025-08-01T18:30:00"}
        ]])))
        .mount(&server)
        .await;

    cmd()
        .args([
            "--api-base",
            &server.uri(),
            "search",
            "-f",
            "AMS",
            "-t",
            "JFK",
            "--datetime",
            "2025-08-01T10:00:00",
            "--compact",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("AMS>JFK | KL641"))
        .stdout(predicate::str::contains("8h 30m"));
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_search_says_so() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    cmd()
        .args(["--api-base", &server.uri(), "search", "-f", "AMS", "-t", "JFK", "-d", "2025-08-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No flights found."));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_prints_backend_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/customers/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    cmd()
        .args(["--api-base", &server.uri(), "get", "customers", "42"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("error: HTTP 404: not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_sends_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(wiremock::matchers::body_json(json!({"firstName": "Ada"})))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    cmd()
        .args([
            "--api-base",
            &server.uri(),
            "create",
            "customers",
            r#"{"firstName": "Ada"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));
}

fn one_leg(number: &str, to: &str, dep: &str, arr: &str) -> serde_json::Value {
    json!([{"flightNumber": number, "flightDeparture": "AMS", "flightDestination": to,
            "departureTime": dep, "arrivalTime": arr}])
}

#[tokio::test(flavor = "multi_thread")]
async fn multi_destination_json_keeps_failed_destination_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .and(query_param("arrival", "JFK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([one_leg(
            "KL641",
            "JFK",
            "2025-08-01T10:00:00",
            "2025-08-01T18:30:00"
        )])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .and(query_param("arrival", "LHR"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    cmd()
        .args([
            "--api-base",
            &server.uri(),
            "--json",
            "search",
            "-f",
            "AMS",
            "-t",
            "JFK,LHR",
            "-d",
            "2025-08-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"{"JFK":[{"flights":"#))
        .stdout(predicate::str::contains(r#""flightNumber":"KL641""#))
        .stdout(predicate::str::contains(r#""LHR":[]}"#))
        .stderr(predicate::str::contains("error: LHR: boom"));
}

#[tokio::test(flavor = "multi_thread")]
async fn multi_destination_table_skips_failed_destination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .and(query_param("arrival", "JFK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([one_leg(
            "KL641",
            "JFK",
            "2025-08-01T10:00:00",
            "2025-08-01T18:30:00"
        )])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .and(query_param("arrival", "LHR"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    cmd()
        .args([
            "--api-base",
            &server.uri(),
            "search",
            "-f",
            "AMS",
            "-t",
            "jfk, lhr",
            "-d",
            "2025-08-01",
            "--compact",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== JFK ==="))
        .stdout(predicate::str::contains("AMS>JFK | KL641"))
        .stdout(predicate::str::contains("=== LHR ===").not())
        .stderr(predicate::str::contains("error: LHR: boom"));
}

#[tokio::test(flavor = "multi_thread")]
async fn top_keeps_shortest_itinerary() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            one_leg("LONG1", "JFK", "2025-08-01T06:00:00", "2025-08-01T16:00:00"),
            one_leg("SHORT1", "JFK", "2025-08-01T07:00:00", "2025-08-01T08:00:00"),
            one_leg("MID1", "JFK", "2025-08-01T08:00:00", "2025-08-01T12:00:00"),
        ])))
        .mount(&server)
        .await;

    cmd()
        .args([
            "--api-base",
            &server.uri(),
            "--json",
            "search",
            "-f",
            "AMS",
            "-t",
            "JFK",
            "-d",
            "2025-08-01",
            "--top",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""flightNumber":"SHORT1""#))
        .stdout(predicate::str::contains("LONG1").not())
        .stdout(predicate::str::contains("MID1").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn airport_codes_are_normalized_alike() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .and(query_param("departure", "AMS"))
        .and(query_param("arrival", "JFK"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    cmd()
        .args(["--api-base", &server.uri(), "search", "-f", "ams", "-t", "jfk", "-d", "2025-08-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No flights found."));
}

#[tokio::test(flavor = "multi_thread")]
async fn zone_flag_controls_offset_less_times() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flights/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([one_leg(
            "KL641",
            "JFK",
            "2025-08-01T10:00:00",
            "2025-08-01T18:30:00"
        )])))
        .mount(&server)
        .await;

    let search = |extra: &[&str]| {
        let mut c = cmd();
        c.args(["--api-base", &server.uri(), "--json"])
            .args(extra)
            .args(["search", "-f", "AMS", "-t", "JFK", "-d", "2025-08-01"]);
        c
    };

    search(&[])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""departureTime":"2025-08-01T08:00:00.000Z""#));

    search(&["--zone", "UTC"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""departureTime":"2025-08-01T10:00:00.000Z""#));
}

#[test]
fn unknown_zone_is_a_config_error() {
    cmd()
        .args(["--api-base", UNREACHABLE, "--zone", "Mars/Olympus", "get", "customers"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown time zone"));
}
