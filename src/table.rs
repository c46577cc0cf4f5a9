use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL};

use crate::model::Itinerary;

pub fn format_hm(minutes: i64) -> String {
    format!("{}h {:02}m", minutes.div_euclid(60), minutes.rem_euclid(60))
}

fn short_time(iso: &str) -> &str {
    // 2025-08-01T14:30:00.000Z -> 2025-08-01 14:30
    iso.get(..16).unwrap_or(iso)
}

pub fn stops_label(itinerary: &Itinerary) -> String {
    let stopovers = itinerary.stopovers();
    match stopovers.len() {
        0 if itinerary.flights.is_empty() => "—".to_string(),
        0 => "Nonstop".to_string(),
        n => format!("{n} ({})", stopovers.join(", ")),
    }
}

pub fn render(itineraries: &[Itinerary]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Flights", "Route", "Depart", "Arrive", "Flying", "Stops", "Layovers",
        ]);

    for itinerary in itineraries {
        let flights: Vec<&str> = itinerary
            .flights
            .iter()
            .map(|f| f.flight_number.as_str())
            .collect();

        let route: Vec<String> = itinerary
            .flights
            .iter()
            .map(|f| format!("{} → {}", f.departure, f.arrival))
            .collect();

        let depart = itinerary
            .flights
            .first()
            .map(|f| short_time(&f.departure_time).replace('T', " "))
            .unwrap_or_else(|| "—".to_string());

        let arrive = itinerary
            .flights
            .last()
            .map(|f| short_time(&f.arrival_time).replace('T', " "))
            .unwrap_or_else(|| "—".to_string());

        let layovers = if itinerary.transfers.is_empty() {
            String::new()
        } else {
            format!(
                "{}\ntotal {}",
                itinerary.transfers.join("\n"),
                format_hm(itinerary.total_transfer_minutes)
            )
        };

        table.add_row(vec![
            flights.join("\n"),
            route.join("\n"),
            depart,
            arrive,
            format_hm(itinerary.total_minutes),
            stops_label(itinerary),
            layovers,
        ]);
    }

    table.to_string()
}
