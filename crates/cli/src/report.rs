//! Plain-text damage breakdown.
use std::fmt::Write;

use sim_core::Spellbook;
use sim_runtime::DamageSummary;

/// Renders one line per spell, highest damage first, then the totals.
pub fn render(summary: &DamageSummary, spells: &Spellbook, duration_ms: u64) -> String {
    let total = summary.total_damage();
    let mut rows: Vec<_> = summary.spells().collect();
    rows.sort_by(|a, b| b.1.damage.total_cmp(&a.1.damage));

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:>6} {:>6} {:>6} {:>6} {:>6} {:>11} {:>6}",
        "spell", "casts", "miss", "hits", "crits", "ticks", "damage", "share"
    );
    for (id, row) in rows {
        let name = spells
            .get(id)
            .map(|spell| spell.name.clone())
            .unwrap_or_else(|| id.to_string());
        let share = if total > 0.0 { row.damage / total * 100.0 } else { 0.0 };
        let _ = writeln!(
            out,
            "{:<28} {:>6} {:>6} {:>6} {:>6} {:>6} {:>11.0} {:>5.1}%",
            name, row.casts, row.misses, row.hits, row.crits, row.ticks, row.damage, share
        );
    }
    let _ = writeln!(
        out,
        "total {:.0} damage, {:.0} threat, {:.1} dps over {:.1}s",
        total,
        summary.total_threat(),
        summary.dps(duration_ms),
        duration_ms as f64 / 1_000.0
    );
    out
}
