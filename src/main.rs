use std::collections::BTreeMap;
use std::process;

use clap::Parser;
use tokio::task::JoinSet;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use flightdesk::config::{parse_zone, ApiConfig, BASE_URL_ENV, ZONE_ENV};
use flightdesk::error::{classify_transport, ApiError};
use flightdesk::fetch::{ApiClient, RequestBody, RequestOptions, ResponseBody};
use flightdesk::model::Itinerary;
use flightdesk::query::format_datetime_for_api;
use flightdesk::table;

#[derive(Parser)]
#[command(
    name = "flightdesk",
    about = "Search flights and manage records on the booking API",
    version,
    after_help = "\
Examples:
  flightdesk search -f AMS -t JFK -d 2025-08-01 --time 14:30
  flightdesk search -f AMS -t JFK,LHR -d 2025-08-01 --compact
  flightdesk get customers 42
  flightdesk create bookings '{\"customerId\": 42, \"flightNumber\": 1001}'"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = BASE_URL_ENV,
        value_name = "URL",
        help = "Base URL of the booking API"
    )]
    api_base: Option<String>,

    #[arg(long, global = true, value_name = "SECS", help = "Request timeout")]
    timeout: Option<u64>,

    #[arg(long, global = true, value_name = "URL", help = "HTTP or SOCKS5 proxy")]
    proxy: Option<String>,

    #[arg(
        long,
        global = true,
        env = ZONE_ENV,
        value_name = "TZ",
        help = "Time zone of offset-less backend timestamps [default: Europe/Amsterdam]"
    )]
    zone: Option<String>,

    #[arg(short, long, global = true, help = "Log requests to stderr")]
    verbose: bool,

    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,

    #[arg(long, global = true, help = "Output as pretty-printed JSON")]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(
        about = "Search for itineraries",
        long_about = "Search itineraries between two airports from a given local date and time.\n\
            Comma-separate -t to search several destinations at once.",
        after_help = "\
Examples:
  Basic:        flightdesk search -f AMS -t JFK -d 2025-08-01
  With time:    flightdesk search -f AMS -t JFK -d 2025-08-01 --time 14:30
  Raw:          flightdesk search -f AMS -t JFK --datetime 2025-08-01T14:30:00
  Multi-dest:   flightdesk search -f AMS -t JFK,LHR,CDG -d 2025-08-01 --top 3"
    )]
    Search(SearchArgs),
    #[command(about = "Fetch a resource collection, or one item by id")]
    Get {
        resource: String,
        id: Option<String>,
    },
    #[command(about = "Create an item (BODY is sent as JSON if it parses, else as text)")]
    Create { resource: String, body: String },
    #[command(about = "Replace an item by id")]
    Update {
        resource: String,
        id: String,
        body: String,
    },
    #[command(about = "Delete an item by id")]
    Delete { resource: String, id: String },
}

#[derive(clap::Args)]
struct SearchArgs {
    #[arg(short, long, value_name = "CODE", help = "Departure airport")]
    from: Option<String>,

    #[arg(
        short, long,
        value_name = "CODE",
        help = "Arrival airport (comma-separate for multi-destination)"
    )]
    to: Option<String>,

    #[arg(short, long, value_name = "YYYY-MM-DD", help = "Departure date")]
    date: Option<String>,

    #[arg(long, default_value = "00:00", value_name = "HH:MM", help = "Earliest departure time")]
    time: String,

    #[arg(
        long,
        value_name = "DATETIME",
        conflicts_with_all = ["date", "time"],
        help = "Combined local date-time, sent as-is (e.g. 2025-08-01T14:30:00)"
    )]
    datetime: Option<String>,

    #[arg(long, value_name = "N", help = "Show only the N shortest itineraries")]
    top: Option<usize>,

    #[arg(long, help = "One-line-per-itinerary output")]
    compact: bool,
}

struct Output {
    json: bool,
    pretty: bool,
}

impl Output {
    fn is_json(&self) -> bool {
        self.json || self.pretty
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}

fn error_code(err: &ApiError) -> i32 {
    match err {
        ApiError::MissingParameters | ApiError::Config(_) => 2,
        ApiError::Transport(_) => 3,
        ApiError::Status { status, .. } if *status < 500 => 4,
        ApiError::Status { .. } => 5,
        ApiError::UnexpectedFormat | ApiError::Decode(_) | ApiError::InvalidTimestamp(_) => 6,
    }
}

fn error_kind(err: &ApiError) -> &'static str {
    match err {
        ApiError::MissingParameters => "missing_parameters",
        ApiError::UnexpectedFormat => "unexpected_format",
        ApiError::Status { .. } => "http_error",
        ApiError::Transport(e) => classify_transport(e).as_str(),
        ApiError::Decode(_) => "decode_error",
        ApiError::InvalidTimestamp(_) => "invalid_timestamp",
        ApiError::Config(_) => "config_error",
    }
}

fn die(err: &ApiError, out: &Output) -> ! {
    if out.is_json() {
        let json = serde_json::json!({
            "error": {
                "kind": error_kind(err),
                "message": err.to_string(),
                "status": err.status(),
                "body": err.body(),
            }
        });
        println!("{json}");
    } else {
        match err.status() {
            Some(status) => eprintln!("error: HTTP {status}: {err}"),
            None => eprintln!("error: {err}"),
        }
    }
    process::exit(error_code(err));
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("flightdesk=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<ApiConfig, ApiError> {
    let mut config = ApiConfig::new(cli.api_base.clone().unwrap_or_default());
    if let Some(secs) = cli.timeout {
        config = config.with_timeout(secs);
    }
    if let Some(ref proxy) = cli.proxy {
        config = config.with_proxy(proxy.as_str());
    }
    if let Some(ref zone) = cli.zone {
        config = config.with_zone(parse_zone(zone)?);
    }
    Ok(config)
}

fn search_datetime(args: &SearchArgs) -> String {
    match (&args.datetime, &args.date) {
        (Some(dt), _) => dt.clone(),
        (None, Some(date)) => format_datetime_for_api(date, &args.time),
        (None, None) => String::new(),
    }
}

fn parse_destinations(args: &SearchArgs) -> Vec<String> {
    args.to
        .as_ref()
        .map(|t| {
            t.split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn apply_top(itineraries: &mut Vec<Itinerary>, n: usize) {
    itineraries.sort_by_key(|i| i.total_minutes + i.total_transfer_minutes);
    itineraries.truncate(n);
}

fn print_compact(itineraries: &[Itinerary]) {
    for itinerary in itineraries {
        let route: Vec<&str> = itinerary
            .origin()
            .into_iter()
            .chain(itinerary.flights.iter().map(|f| f.arrival.as_str()))
            .collect();
        let numbers: Vec<&str> = itinerary
            .flights
            .iter()
            .map(|f| f.flight_number.as_str())
            .collect();
        let depart = itinerary
            .flights
            .first()
            .map(|f| f.departure_time.as_str())
            .unwrap_or("—");

        println!(
            "{} | {} | {} | {} | layover {}",
            route.join(">"),
            numbers.join(","),
            depart,
            table::format_hm(itinerary.total_minutes),
            table::format_hm(itinerary.total_transfer_minutes),
        );
    }
}

fn print_itineraries(itineraries: &[Itinerary], args: &SearchArgs, out: &Output) {
    if out.is_json() {
        println!("{}", out.to_json(&itineraries));
    } else if itineraries.is_empty() {
        println!("No flights found.");
    } else if args.compact {
        print_compact(itineraries);
    } else {
        println!("{}", table::render(itineraries));
    }
}

fn print_body(body: &ResponseBody, out: &Output) {
    match body {
        ResponseBody::Text(text) if !out.is_json() => println!("{text}"),
        _ => println!("{}", out.to_json(body)),
    }
}

fn request_body(raw: String) -> RequestBody {
    match serde_json::from_str(&raw) {
        Ok(value) => RequestBody::Json(value),
        Err(_) => RequestBody::Raw(raw),
    }
}

async fn run_search(client: ApiClient, args: SearchArgs, out: &Output) {
    let from = args
        .from
        .as_deref()
        .map(|f| f.trim().to_uppercase())
        .unwrap_or_default();
    let datetime = search_datetime(&args);
    let destinations = parse_destinations(&args);

    if destinations.len() <= 1 {
        let to = destinations.into_iter().next().unwrap_or_default();
        match client.search_flights(&from, &to, &datetime).await {
            Ok(mut itineraries) => {
                if let Some(n) = args.top {
                    apply_top(&mut itineraries, n);
                }
                print_itineraries(&itineraries, &args, out);
            }
            Err(e) => die(&e, out),
        }
        return;
    }

    let mut join_set = JoinSet::new();
    for dest in destinations {
        let client = client.clone();
        let from = from.clone();
        let datetime = datetime.clone();
        join_set.spawn(async move {
            let result = client.search_flights(&from, &dest, &datetime).await;
            (dest, result)
        });
    }

    let mut results: BTreeMap<String, Vec<Itinerary>> = BTreeMap::new();
    while let Some(joined) = join_set.join_next().await {
        let (dest, result) = match joined {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("error: search task failed: {e}");
                continue;
            }
        };
        match result {
            Ok(mut itineraries) => {
                if let Some(n) = args.top {
                    apply_top(&mut itineraries, n);
                }
                results.insert(dest, itineraries);
            }
            Err(e @ ApiError::MissingParameters) => die(&e, out),
            Err(e) => {
                eprintln!("error: {dest}: {e}");
                if out.is_json() {
                    results.insert(dest, Vec::new());
                }
            }
        }
    }

    if out.is_json() {
        println!("{}", out.to_json(&results));
        return;
    }
    for (dest, itineraries) in &results {
        println!("=== {dest} ===");
        print_itineraries(itineraries, &args, out);
        println!();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let out = Output {
        json: cli.json,
        pretty: cli.pretty,
    };

    let client = match build_config(&cli).and_then(ApiClient::new) {
        Ok(c) => c,
        Err(e) => die(&e, &out),
    };
    debug!(base = %client.config().base_url, "client ready");

    let options = RequestOptions::default();
    let result = match cli.command {
        Commands::Search(args) => return run_search(client, args, &out).await,
        Commands::Get { resource, id: None } => client.list(&resource, options).await,
        Commands::Get {
            resource,
            id: Some(id),
        } => client.one(&resource, &id, options).await,
        Commands::Create { resource, body } => {
            client.create(&resource, request_body(body), options).await
        }
        Commands::Update { resource, id, body } => {
            client.update(&resource, &id, request_body(body), options).await
        }
        Commands::Delete { resource, id } => client.delete(&resource, &id, options).await,
    };

    match result {
        Ok(body) => print_body(&body, &out),
        Err(e) => die(&e, &out),
    }
}
