// Tank report: last night's relevant results, the in-range standings with
// lottery odds, and tonight's rooting guide.

use super::{fmt_team, fmt_vs, Document, Element, Table};
use crate::analysis::tank::{Analysis, Matchup};
use crate::analysis::Matchup as _;
use crate::model::Standing;

fn fmt_cheer(matchup: &Matchup) -> String {
    let cheer = matchup.cheer();
    if cheer.overtime {
        format!("{} (OT)", fmt_team(&cheer.team))
    } else {
        fmt_team(&cheer.team)
    }
}

fn result_table(results: &[&Matchup]) -> Table {
    let mut t = Table::new();
    t.add_columns(&["Game", "Score", "Yay?"]);
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

fn standings_table(standings: &[Standing]) -> Table {
    let mut t = Table::new();
    t.add_columns(&[
        "Place", "Team", "GP", "Record", "Points", "ROW", "L10", "1st OA odds",
    ]);
    for s in standings {
        t.add_row(vec![
            s.place.to_string(),
            fmt_team(&s.team),
            s.games_played.to_string(),
            s.record.clone(),
            s.points.to_string(),
            s.row.to_string(),
            s.last10.clone(),
            format!("{}%", s.odds),
        ]);
    }
    t
}

fn games_table(games: &[&Matchup]) -> Table {
    let mut t = Table::new();
    t.add_columns(&["Game", "Cheer for?", "Time"]);
    for g in games {
        t.add_row(vec![
            fmt_vs(&g.game.away, &g.game.home),
            fmt_cheer(g),
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
        items: vec!["Our tank:".to_string()],
        numbered: false,
    });
    match mine {
        Some(m) => doc.add(Element::Table(table(&[m]))),
        None => doc.add(Element::Paragraph("Nothing.".to_string())),
    }

    doc.add(Element::List {
        items: vec!["Out of town tank:".to_string()],
        numbered: false,
    });
    if others.is_empty() {
        doc.add(Element::Paragraph("Nothing out of town.".to_string()));
    } else {
        let refs: Vec<&Matchup> = others.iter().collect();
        doc.add(Element::Table(table(&refs)));
    }
}

/// Render the full tank report.
pub fn generate(analysis: &Analysis) -> String {
    let mut doc = Document::new();
    doc.add(Element::h1("Scouting the Tank"));

    add_slate(
        &mut doc,
        "Last night's tank",
        analysis.my_result.as_ref(),
        &analysis.results,
        result_table,
    );
    doc.add(Element::HorizontalRule);

    doc.add(Element::h2("Standings"));
    doc.add(Element::Table(standings_table(&analysis.standings)));
    doc.add(Element::Paragraph(
        "[Lottery odds, as well as a Lottery Simulator, can be found here.](http://nhllotterysimulator.com)"
            .to_string(),
    ));
    doc.add(Element::HorizontalRule);

    add_slate(
        &mut doc,
        "Tonight's tank",
        analysis.my_game.as_ref(),
        &analysis.games,
        games_table,
    );

    doc.render()
}
