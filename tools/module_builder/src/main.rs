use assessor_core::extract::assemble::build_module;
use assessor_core::extract::profile::ProfileSet;
use assessor_core::module::loader::save_module;
use assessor_core::module::model::QuestionsSource;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("usage: module_builder <source_text_dir> <out_modules_dir> [extract_profiles.yaml]");
        std::process::exit(2);
    }
    let source_dir = Path::new(&args[1]);
    let out_dir = Path::new(&args[2]);

    let profiles = match args.get(3) {
        Some(path) => match ProfileSet::load(Path::new(path)) {
            Ok(profiles) => profiles,
            Err(e) => {
                eprintln!("failed to load profiles from {}: {}", path, e);
                std::process::exit(2);
            }
        },
        None => ProfileSet::default(),
    };

    let sources = collect_text_files(source_dir);
    if sources.is_empty() {
        eprintln!("no .txt source documents found in {}", source_dir.display());
        std::process::exit(1);
    }

    let mut built = 0usize;
    let mut failed = 0usize;

    for source in &sources {
        let stem = module_stem_for(source);
        let out_path = out_dir.join(format!("{}.yaml", stem));

        let raw = match std::fs::read_to_string(source) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("MODULE_BUILDER FAIL {}: {}", source.display(), e);
                failed += 1;
                continue;
            }
        };
        if raw.trim().is_empty() {
            println!("MODULE_BUILDER SKIP {} (empty file)", source.display());
            continue;
        }

        match build_module(&raw, &stem, &profiles) {
            Ok(mut module) => {
                module.meta.source_path = Some(source.display().to_string());
                let source_label = module
                    .meta
                    .questions_source
                    .map(|s| match s {
                        QuestionsSource::Pdf => "pdf",
                        QuestionsSource::Synthesized => "synthesized",
                    })
                    .unwrap_or("unknown");
                if let Err(e) = save_module(&module, &out_path) {
                    eprintln!("MODULE_BUILDER FAIL {}: {}", out_path.display(), e);
                    failed += 1;
                    continue;
                }
                println!(
                    "MODULE_BUILDER OK {} -> {} questions={} source={}",
                    source.display(),
                    out_path.display(),
                    module.questions.len(),
                    source_label
                );
                built += 1;
            }
            Err(e) => {
                eprintln!("MODULE_BUILDER FAIL {}: {}", source.display(), e);
                failed += 1;
            }
        }
    }

    println!("MODULE_BUILDER done built={} failed={}", built, failed);
    if built == 0 && failed > 0 {
        std::process::exit(1);
    }
}

fn collect_text_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("txt"))
        .collect();
    files.sort();
    files
}

/// Module stem from a source filename:
/// "1. Policies and Procedures" -> "01_policies_and_procedures",
/// "07 Training" -> "07_training", anything else slugified as-is.
fn module_stem_for(path: &Path) -> String {
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let dotted = Regex::new(r"^\s*(\d+)\.\s*(.+?)\s*$").unwrap();
    let spaced = Regex::new(r"^\s*(\d+)\s+(.+?)\s*$").unwrap();

    if let Some(caps) = dotted.captures(name).or_else(|| spaced.captures(name)) {
        let num: u32 = caps[1].parse().unwrap_or(0);
        return format!("{:02}_{}", num, slugify(&caps[2]));
    }
    slugify(name)
}

fn slugify(s: &str) -> String {
    let cleaned = Regex::new(r"[^\w\s-]").unwrap().replace_all(s, "");
    Regex::new(r"[\s-]+")
        .unwrap()
        .replace_all(cleaned.trim(), "_")
        .to_lowercase()
}
