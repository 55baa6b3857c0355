use assessor_core::extract::synthesize::synthesize_questions;
use assessor_core::module::loader::{list_modules, load_module, save_module};
use assessor_core::module::model::{Module, Question, QuestionsSource};
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: module_enricher <modules_dir>");
        std::process::exit(2);
    }
    let modules_dir = Path::new(&args[1]);

    let listing = match list_modules(modules_dir) {
        Ok(listing) => listing,
        Err(e) => {
            eprintln!("failed to list modules in {}: {}", modules_dir.display(), e);
            std::process::exit(1);
        }
    };

    let mut enriched = 0usize;
    let mut failed = 0usize;

    for (stem, _title) in listing {
        let mut module = match load_module(modules_dir, &stem, false) {
            Ok(Some(module)) => module,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("MODULE_ENRICHER FAIL {}: {}", stem, e);
                failed += 1;
                continue;
            }
        };

        if !enrich_module(&mut module) {
            continue;
        }

        let path = modules_dir.join(format!("{}.yaml", stem));
        match save_module(&module, &path) {
            Ok(()) => {
                println!(
                    "MODULE_ENRICHER OK {} questions={}",
                    stem,
                    module.questions.len()
                );
                enriched += 1;
            }
            Err(e) => {
                eprintln!("MODULE_ENRICHER FAIL {}: {}", stem, e);
                failed += 1;
            }
        }
    }

    println!("MODULE_ENRICHER done enriched={} failed={}", enriched, failed);
    if failed > 0 {
        std::process::exit(1);
    }
}

/// Fill a question-less module with synthesized questions and stamp the
/// provenance. Modules that already carry questions are left untouched;
/// returns whether the module was changed (and so needs rewriting).
fn enrich_module(module: &mut Module) -> bool {
    if !module.questions.is_empty() {
        return false;
    }

    module.questions = synthesize_questions(module)
        .into_iter()
        .map(|prompt| Question {
            id: Question::stable_id(&module.module_id, &prompt),
            prompt,
            reference: None,
            evidence_requests: Vec::new(),
            area: None,
        })
        .collect();
    module.meta.questions_source = Some(QuestionsSource::Synthesized);
    true
}
