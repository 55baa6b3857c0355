use assessor_core::extract::synthesize::MAX_SYNTHESIZED_QUESTIONS;
use assessor_core::module::loader::{list_modules, load_module};
use assessor_core::module::model::QuestionsSource;
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: module_validator <modules_dir>");
        std::process::exit(2);
    }
    let modules_dir = Path::new(&args[1]);

    let listing = match list_modules(modules_dir) {
        Ok(listing) if !listing.is_empty() => listing,
        Ok(_) => {
            eprintln!("no modules found in {}", modules_dir.display());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("failed to list modules in {}: {}", modules_dir.display(), e);
            std::process::exit(1);
        }
    };

    let mut failed = 0usize;

    for (stem, _title) in &listing {
        let module = match load_module(modules_dir, stem, true) {
            Ok(Some(module)) => module,
            Ok(None) => continue,
            Err(e) => {
                println!("MODULE_VALIDATOR FAIL {} ({})", stem, e);
                failed += 1;
                continue;
            }
        };

        let mut violations = module.invariant_violations();

        if module.meta.questions_source == Some(QuestionsSource::Synthesized)
            && module.questions.len() > MAX_SYNTHESIZED_QUESTIONS
        {
            violations.push(format!(
                "synthesized question count {} exceeds cap {}",
                module.questions.len(),
                MAX_SYNTHESIZED_QUESTIONS
            ));
        }

        if violations.is_empty() {
            println!("MODULE_VALIDATOR PASS {}", stem);
        } else {
            for violation in &violations {
                println!("MODULE_VALIDATOR FAIL {} ({})", stem, violation);
            }
            failed += 1;
        }
    }

    println!(
        "MODULE_VALIDATOR overall={} modules={} failed={}",
        if failed == 0 { "PASS" } else { "FAIL" },
        listing.len(),
        failed
    );
    if failed > 0 {
        std::process::exit(1);
    }
}
