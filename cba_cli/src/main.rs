//! # Continuous Beam Analysis CLI
//!
//! Reads a beam definition document (JSON), analyses every load combination
//! in it and prints a text report.
//!
//! ```text
//! cba_cli beam.json          # text report
//! cba_cli beam.json --json   # results as JSON
//! cat beam.json | cba_cli -  # read from stdin
//! ```
//!
//! Set `RUST_LOG=debug` to trace assembly and solve.

use std::io::{self, Read};
use std::process::ExitCode;

use cba_core::calculations::{AnalysisResult, Dof, Envelope, ReactionSource};
use cba_core::units::{Meters, Millimeters};
use cba_core::{BeamDefinition, CbaError, CbaResult};
use serde::Serialize;

const USAGE: &str = "usage: cba_cli <definition.json | -> [--json]";

#[derive(Serialize)]
struct Report {
    label: String,
    results: Vec<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    envelope: Option<Envelope>,
}

fn read_input(path: &str) -> CbaResult<String> {
    let mut text = String::new();
    let read = if path == "-" {
        io::stdin().read_to_string(&mut text).map(|_| ())
    } else {
        std::fs::read_to_string(path).map(|contents| text = contents)
    };
    read.map_err(|e| CbaError::invalid_input("input", path, e.to_string()))?;
    Ok(text)
}

fn run(path: &str) -> CbaResult<Report> {
    report_from_json(&read_input(path)?)
}

fn report_from_json(json: &str) -> CbaResult<Report> {
    let definition = BeamDefinition::from_json(json)?;
    let beam = definition.build()?;
    log::info!(
        "analysing '{}': {} spans, {} loads",
        definition.label,
        beam.span_count(),
        beam.loads().len()
    );

    let results = definition
        .combinations()
        .iter()
        .map(|combo| beam.analyze_combination(combo, &definition.options))
        .collect::<CbaResult<Vec<_>>>()?;

    let envelope = if results.len() > 1 {
        Some(Envelope::from_results(&results)?)
    } else {
        None
    };

    Ok(Report {
        label: definition.label,
        results,
        envelope,
    })
}

fn print_result(result: &AnalysisResult) {
    let summary = result.summary();
    let deflection_mm = Millimeters::from(Meters(summary.max_deflection.value));

    println!("───────────────────────────────────────");
    println!("  Combination: {}", result.combination());
    println!("───────────────────────────────────────");
    println!("Reactions:");
    for reaction in result.reactions() {
        let (quantity, unit) = match reaction.dof {
            Dof::Vertical => ("R", "kN"),
            Dof::Rotation => ("M", "kN·m"),
        };
        let spring = if reaction.source == ReactionSource::Spring {
            " (spring)"
        } else {
            ""
        };
        println!(
            "  Node {} @ {:>7.3} m: {} = {:>10.3} {}{}",
            reaction.node, reaction.x, quantity, reaction.value, unit, spring
        );
    }
    println!();
    println!("Demand:");
    println!(
        "  M_max = {:>10.3} kN·m @ {:.3} m",
        summary.max_moment.value, summary.max_moment.x
    );
    println!(
        "  M_min = {:>10.3} kN·m @ {:.3} m",
        summary.min_moment.value, summary.min_moment.x
    );
    println!(
        "  V_max = {:>10.3} kN   @ {:.3} m",
        summary.max_shear.value, summary.max_shear.x
    );
    println!(
        "  V_min = {:>10.3} kN   @ {:.3} m",
        summary.min_shear.value, summary.min_shear.x
    );
    println!(
        "  δ_max = {:>10.3} mm   @ {:.3} m",
        deflection_mm.value(),
        summary.max_deflection.x
    );
    println!();
    println!(
        "Equilibrium: ΣP = {:.3} kN, ΣR = {:.3} kN",
        summary.total_load, summary.total_vertical_reaction
    );

    if summary.deflection_checks.iter().any(|c| !c.limits.is_empty()) {
        println!();
        println!("Deflection Checks:");
        for check in &summary.deflection_checks {
            let ratio = check
                .span_ratio
                .map(|r| format!("L/{:.0}", r))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  Span {} (L = {:.3} m): δ = {:.3} mm @ {:.3} m, {}",
                check.span,
                check.length,
                Millimeters::from(Meters(check.max_deflection.value)).value(),
                check.max_deflection.x,
                ratio
            );
            for limit in &check.limits {
                println!(
                    "    L/{:<4.0} = {:>8.3} mm {}",
                    limit.ratio,
                    Millimeters::from(Meters(limit.allowable)).value(),
                    status_icon(limit.passes)
                );
            }
        }
        println!(
            "  RESULT: {}",
            if summary.deflection_ok() { "PASS" } else { "FAIL" }
        );
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn print_report(report: &Report) {
    println!("═══════════════════════════════════════");
    println!("  CONTINUOUS BEAM ANALYSIS: {}", report.label);
    println!("═══════════════════════════════════════");
    for result in &report.results {
        println!();
        print_result(result);
    }
    if let Some(envelope) = &report.envelope {
        let max = envelope.moment_max.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = envelope.moment_min.iter().copied().fold(f64::INFINITY, f64::min);
        println!();
        println!("═══════════════════════════════════════");
        println!(
            "  ENVELOPE ({}): M from {:.3} to {:.3} kN·m",
            envelope.combinations.join(", "),
            min,
            max
        );
        println!("═══════════════════════════════════════");
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let Some(path) = args.iter().find(|a| !a.starts_with("--")) else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };

    match run(path) {
        Ok(report) => {
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print_report(&report);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SPAN: &str = r#"{
        "label": "B-2",
        "spans": [6.0, 4.0],
        "stiffness": 20000.0,
        "supports": ["Pinned", "Pinned", "Roller"],
        "loads": [
            { "span": 1, "type": "Uniform", "magnitude": 10.0 },
            { "span": 2, "type": "Point", "magnitude": 20.0, "position": 0.5, "category": "Live" }
        ],
        "combinations": [
            { "name": "SVC", "factors": { "Dead": 1.0, "Live": 1.0 } },
            { "name": "SDM", "factors": { "Dead": 1.4, "Live": 1.7 } }
        ]
    }"#;

    #[test]
    fn test_report_from_definition() {
        let report = report_from_json(TWO_SPAN).unwrap();
        assert_eq!(report.label, "B-2");
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[1].combination(), "SDM");

        // 10 * 6 + 20 in service, 1.4 * 60 + 1.7 * 20 factored
        let service = report.results[0].summary();
        assert!((service.total_load - 80.0).abs() < 1e-9);
        assert!(service.equilibrium_error().abs() < 1e-9);
        assert!((report.results[1].summary().total_load - 118.0).abs() < 1e-9);
        assert_eq!(service.deflection_checks.len(), 2);

        let envelope = report.envelope.as_ref().unwrap();
        assert_eq!(envelope.combinations, vec!["SVC", "SDM"]);
        assert_eq!(envelope.x, report.results[0].x());

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["envelope"]["moment_max"].is_array());
        assert!(json["results"][0]["summary"]["deflection_checks"].is_array());
    }

    #[test]
    fn test_single_combination_has_no_envelope() {
        let json = r#"{"spans": [5.0], "stiffness": 1000.0, "supports": ["Fixed", "Free"],
            "loads": [{ "span": 1, "type": "Point", "magnitude": 2.0, "position": 1.0 }]}"#;
        let report = report_from_json(json).unwrap();
        assert_eq!(report.results.len(), 1);
        assert!(report.envelope.is_none());
        assert!(serde_json::to_value(&report).unwrap().get("envelope").is_none());
    }

    #[test]
    fn test_report_errors() {
        let err = report_from_json(r#"{"spans": [5.0], "stiffness": 1000.0}"#)
            .err()
            .unwrap();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = run("/nonexistent/beam.json").err().unwrap();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
