// Playoff-race report: last night's race, the seeded conference standings,
// the projected first round, and tonight's rooting guide.

use super::{fmt_team, fmt_vs, Document, Element, Table};
use crate::analysis::playoffs::{Analysis, Matchup};
use crate::analysis::Matchup as _;
use crate::model::Standing;

const STANDINGS_COLUMNS: &[&str] = &[
    "Place", "Team", "GP", "Record", "Points", "ROW", "L10", "P%", "P-82",
];

fn fmt_seed(standing: &Standing) -> String {
    match standing.seed {
        Some(seed) => format!("{} ({})", fmt_team(&standing.team), seed),
        None => fmt_team(&standing.team),
    }
}

fn standing_row(s: &Standing) -> Vec<String> {
    vec![
        s.seed.map(|seed| seed.to_string()).unwrap_or_default(),
        fmt_team(&s.team),
        s.games_played.to_string(),
        s.record.clone(),
        s.points.to_string(),
        s.row.to_string(),
        s.last10.clone(),
        s.point_percent.clone(),
        s.projection.to_string(),
    ]
}

fn division_table(standings: &[Standing]) -> Table {
    let mut t = Table::new();
    t.add_columns(STANDINGS_COLUMNS);
    for s in standings {
        t.add_row(standing_row(s));
    }
    t
}

/// Wildcard table with a cut line under the second seed.
fn wildcard_table(standings: &[Standing]) -> Table {
    let mut t = Table::new();
    t.add_columns(STANDINGS_COLUMNS);
    for (idx, s) in standings.iter().enumerate() {
        if idx == 2 {
            t.add_row(vec!["-".to_string(); STANDINGS_COLUMNS.len()]);
        }
        t.add_row(standing_row(s));
    }
    t
}

fn bracket_table(analysis: &Analysis) -> Table {
    let mut t = Table::new();
    t.add_columns(&["High seed", "", "Low seed"]);
    for pairing in &analysis.playoffs_matchups {
        t.add_row(vec![
            fmt_seed(&pairing.high),
            "vs".to_string(),
            fmt_seed(&pairing.low),
        ]);
    }
    t
}

fn result_table(results: &[&Matchup]) -> Table {
    let mut t = Table::new();
    t.add_columns(&["Game", "Score", "Outcome"]);
    for r in results {
        let score = r.game.score.expect("result table rows wrap completed games");
        let ot = if score.overtime { "(OT)" } else { "" };
        let winner = r.game.winner().expect("completed game has a winner");
        t.add_row(vec![
            fmt_vs(&r.game.away, &r.game.home),
            format!("{}-{} {} {}", score.away, score.home, fmt_team(winner), ot),
            r.mood().to_string(),
        ]);
    }
    t
}

fn games_table(games: &[&Matchup]) -> Table {
    let mut t = Table::new();
    t.add_columns(&["Game", "Cheer for", "Time"]);
    for g in games {
        t.add_row(vec![
            fmt_vs(&g.game.away, &g.game.home),
            fmt_team(&g.cheer().team),
            g.time.clone(),
        ]);
    }
    t
}

fn add_slate(
    doc: &mut Document,
    title: &str,
    mine: Option<&Matchup>,
    others: &[Matchup],
    table: fn(&[&Matchup]) -> Table,
) {
    doc.add(Element::h2(title));

    doc.add(Element::List {
        items: vec!["Our race:".to_string()],
        numbered: false,
    });
    match mine {
        Some(m) => doc.add(Element::Table(table(&[m]))),
        None => doc.add(Element::Paragraph("Nothing.".to_string())),
    }

    doc.add(Element::List {
        items: vec!["Out of town:".to_string()],
        numbered: false,
    });
    if others.is_empty() {
        doc.add(Element::Paragraph("Nothing out of town.".to_string()));
    } else {
        let refs: Vec<&Matchup> = others.iter().collect();
        doc.add(Element::Table(table(&refs)));
    }
}

/// Render the full playoff-race report.
pub fn generate(analysis: &Analysis) -> String {
    let mut doc = Document::new();
    doc.add(Element::h1("Race to the Playoffs"));
    doc.add(Element::Paragraph(format!(
        "Our outlook: {}.",
        analysis.my_outlook
    )));

    add_slate(
        &mut doc,
        "Last night's race",
        analysis.my_result.as_ref(),
        &analysis.results,
        result_table,
    );
    doc.add(Element::HorizontalRule);

    doc.add(Element::h2("Standings"));
    doc.add(Element::Table(division_table(&analysis.own_division)));
    doc.add(Element::Table(division_table(&analysis.other_division)));
    doc.add(Element::Table(wildcard_table(&analysis.wildcard)));
    doc.add(Element::HorizontalRule);

    doc.add(Element::h2("Current playoffs matchups"));
    doc.add(Element::Table(bracket_table(analysis)));
    doc.add(Element::HorizontalRule);

    add_slate(
        &mut doc,
        "Tonight's race",
        analysis.my_game.as_ref(),
        &analysis.games,
        games_table,
    );

    doc.render()
}
