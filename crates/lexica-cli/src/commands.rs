use colored::Colorize;

use lexica_import::{
    AnnotationCensus, CanonicalRewriter, EchoCompiler, ExpressionAggregator, ImportRun,
};
use lexica_source::{ContentLocator, ContentSource};
use lexica_store::{ComponentStore, InMemoryComponentStore, Transaction};
use lexica_types::{Category, ComponentId};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Import(args) => cmd_import(args),
        Command::Stats(args) => cmd_stats(args, &cli.format),
        Command::Show(args) => cmd_show(args),
    }
}

fn locator(args: &ReleaseArgs) -> ContentLocator {
    match (&args.entry, &args.outer) {
        (None, _) => ContentLocator::file(&args.release),
        (Some(entry), None) => ContentLocator::archive_entry(&args.release, entry),
        (Some(entry), Some(outer)) => {
            ContentLocator::nested_archive_entry(&args.release, outer, entry)
        }
    }
}

fn import(store: &dyn ComponentStore, txn: &Transaction, args: &ReleaseArgs) -> anyhow::Result<ImportStats> {
    let source = ContentSource::new(locator(args));
    let run = ImportRun::new(store);
    let imported = run.import_release(txn, &source)?;
    Ok(ImportStats {
        label: source.label(),
        imported,
    })
}

struct ImportStats {
    label: String,
    imported: u64,
}

fn cmd_import(args: ImportArgs) -> anyhow::Result<()> {
    let store = InMemoryComponentStore::new();
    let txn = Transaction::new();
    let run = ImportRun::new(&store);

    let source = ContentSource::new(locator(&args.release));
    let imported = run.import_release(&txn, &source)?;
    println!(
        "{} Imported {} axiom records from {}",
        "✓".green().bold(),
        imported.to_string().bold(),
        source.label()
    );

    let rewriter = CanonicalRewriter::new();
    let compiler = EchoCompiler;
    let aggregator = ExpressionAggregator::new(&store, &rewriter, &compiler);
    if args.aggregate_all {
        let aggregated = run.aggregate_all(&txn, &aggregator)?;
        println!(
            "{} Aggregated {} subjects",
            "✓".green(),
            aggregated.to_string().bold()
        );
    } else if !args.subjects.is_empty() {
        let subjects: Vec<ComponentId> = args
            .subjects
            .iter()
            .map(|legacy| ComponentId::from_legacy(legacy))
            .collect();
        run.aggregate_subjects(&txn, &aggregator, &subjects)?;
        for (legacy, subject) in args.subjects.iter().zip(&subjects) {
            println!("  {} {} -> {}", "aggregated:".green(), legacy, subject.to_string().cyan());
        }
    }

    let stamps = txn.commit();
    println!(
        "{} Committed: {} records, {} stamps",
        "✓".green().bold(),
        run.writer().written().to_string().bold(),
        stamps
    );
    Ok(())
}

fn cmd_stats(args: StatsArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let store = InMemoryComponentStore::new();
    let txn = Transaction::new();
    let stats = import(&store, &txn, &args.release)?;
    txn.commit();

    let census = AnnotationCensus::collect(&store)?;
    census.log(&store)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&census)?),
        OutputFormat::Text => {
            println!("Release: {}", stats.label.bold());
            println!("Imported records: {}", stats.imported.to_string().bold());
            println!("Subjects: {}", census.subjects.to_string().bold());
            for (count, subjects) in census.by_count.iter().enumerate() {
                println!("  {count} axiom records: {subjects}");
            }
            println!("  6+ axiom records: {}", census.six_or_more);
            for subject in &census.crowded {
                println!("    {}", subject.to_string().yellow());
            }
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let store = InMemoryComponentStore::new();
    let txn = Transaction::new();
    import(&store, &txn, &args.release)?;
    txn.commit();

    let subject = ComponentId::from_legacy(&args.subject);
    match store.resolve_subject(&subject)? {
        Some(_) => {
            println!(
                "Records for subject {} ({}):",
                args.subject.bold(),
                subject.to_string().cyan()
            );
            store.for_each_for_subject_of_category(
                &subject,
                Category::AxiomAnnotation,
                &mut |record| {
                    println!("  {}", record);
                    if let Some(expression) = record.expression() {
                        println!("    {}", expression.dimmed());
                    }
                },
            )?;
        }
        None => println!("{} No records for subject {}", "!".yellow().bold(), args.subject),
    }
    Ok(())
}
