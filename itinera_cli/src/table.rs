use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use itinera_optimizer::report::solution_record::SolutionRecord;

fn flag(ok: bool) -> &'static str {
    if ok { "yes" } else { "NO" }
}

pub fn solutions_table(records: &[SolutionRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Destination",
            "Outbound",
            "Outbound cost",
            "Return",
            "Return cost",
            "Total cost",
            "Stay (h)",
            "Cost OK",
            "Stay OK",
            "Objective",
        ]);

    for record in records {
        table.add_row(vec![
            record.destination.clone(),
            record.outbound.id.clone(),
            format!("{:.2}", record.outbound.cost),
            record.return_trip.id.clone(),
            format!("{:.2}", record.return_trip.cost),
            format!("{:.2}", record.total_cost),
            format!("{:.1}", record.stay_hours),
            flag(record.cost_ok).to_owned(),
            flag(record.stay_ok).to_owned(),
            format!("{:.4}", record.objective),
        ]);
    }

    table
}
