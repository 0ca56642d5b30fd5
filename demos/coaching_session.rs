use chrono::NaiveDate;
use scenario_impact_engine::*;

fn print_result(result: &CalculationResult) {
    println!("  Monthly impact:  {:>12.2}", result.monthly_impact);
    println!("  Annual impact:   {:>12.2}", result.annual_impact);
    println!("  Profit change:   {:>11.1}%", result.profit_change);
    if let Some(months) = result.break_even_months {
        println!("  Break-even:      {:>9} month(s)", months);
    }
    if let Some(breakdown) = &result.monthly_breakdown {
        println!("\n  Month-by-month:");
        for (month, impact) in breakdown.iter().enumerate() {
            println!("    {:<10} {:>10.0}", utils::month_name(month as u32), impact);
        }
    }
    println!("\n  {}", result.recommendation);
    for detail in &result.details {
        println!("    - {}", detail);
    }
}

fn main() {
    println!("💬 Scenario Coaching Session\n");

    let config = EngineConfig {
        reference_month: 3,
        ..EngineConfig::default()
    };
    let engine = match ScenarioEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            return;
        }
    };

    let history = vec![
        RevenueEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            amount: 41_200.0,
        },
        RevenueEntry {
            date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            amount: 38_900.0,
        },
        RevenueEntry {
            date: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            amount: 44_750.0,
        },
    ];
    let baseline = engine.baseline(&history);
    println!("📊 {}\n", baseline.note);

    let question = "What if I start a membership plan for the summer?";
    println!("❓ {}", question);

    // Each round adds the owner's latest answers to what they said before.
    let answer_rounds = [
        UserProvidedInputs::new(),
        UserProvidedInputs::new().with(InputField::MonthlyFee, 89.0),
        UserProvidedInputs::new()
            .with(InputField::TargetMembers, 60.0)
            .with(InputField::SetupCost, 2500.0),
    ];

    let mut answers = UserProvidedInputs::new();
    for (round, new_answers) in answer_rounds.iter().enumerate() {
        answers = answers.merged_with(new_answers);
        let classification = engine.classify(question, &answers);

        println!(
            "\n🔄 Round {}: {} ({:?}, confidence {:.2})",
            round + 1,
            classification.scenario_type,
            classification.response_type,
            classification.confidence
        );
        if let Some(factors) = &classification.seasonality {
            println!(
                "  Seasonality: {} pattern starting in {}, {} month ramp-up",
                factors.seasonal_pattern,
                utils::month_name(factors.start_month),
                factors.ramp_up_months
            );
        }
        if !classification.ask_user.is_empty() {
            println!("  Coach asks: {}", classification.ask_user);
        }
    }

    let outcome = engine.evaluate(question, &answers, Some(baseline.monthly_revenue));
    if !outcome.classification.is_complete() {
        println!("\n⚠️  Still missing: {:?}", outcome.classification.missing_inputs);
        return;
    }

    println!("\n✅ Results:\n");
    print_result(&outcome.result);

    match outcome.to_json() {
        Ok(json) => println!("\n📄 Outcome JSON:\n{}", json),
        Err(e) => eprintln!("❌ Could not serialize outcome: {}", e),
    }
}
