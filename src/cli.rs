//! Minimal CLI: field list → (preview | generate)
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::config::{Direction, GeneratorConfig, NamingStyle, ValidationNamespace};
use crate::field::FieldSpec;
use crate::pipeline::{self, Generation};

// ------------------------------- Types ------------------------------------ //

/// turn a leveled field list into DTO class sources carrying serialization and validation annotations
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// render every class and print the bundle to stdout
    Preview(PreviewOut),
    /// render every class and write one .java file per class
    Generate(GenerateOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (one field record per line)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// generator configuration file (JSON)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// target package for the emitted classes (overrides the config file)
    #[arg(long)]
    package: Option<String>,

    /// message id driving root-class naming
    #[arg(long)]
    message_id: Option<String>,

    /// message direction, selects the root-class suffix
    #[arg(long, value_enum)]
    direction: Option<Direction>,

    /// author recorded in the class comment block
    #[arg(long)]
    author: Option<String>,

    /// explicit root class name (used when no message id applies)
    #[arg(long)]
    root_name: Option<String>,

    /// validation namespace the annotations import from
    #[arg(long, value_enum)]
    validation: Option<ValidationNamespace>,

    /// primary serialized-property naming style
    #[arg(long, value_enum)]
    property_style: Option<NamingStyle>,
}

#[derive(Parser, Debug)]
struct PreviewOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file for the bundle (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// target directory for the generated .java files
    #[arg(short, long)]
    out_dir: PathBuf,

    /// skip classes whose file already exists instead of replacing it
    #[arg(long, default_value_t = false)]
    keep_existing: bool,
}

// ---------------------------- Implementation ------------------------------ //

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Preview(target) => {
                let fields = target.input_settings.load_fields()?;
                let config = target.input_settings.load_config()?;
                let generation = pipeline::generate(&fields, &config)?;

                let mut bundle = String::new();
                for (class_name, source) in &generation.classes {
                    bundle.push_str(&format!("// ==== {class_name}.java ====\n"));
                    bundle.push_str(source);
                    bundle.push('\n');
                }
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            fs::create_dir_all(parent)
                                .with_context(|| format!("failed to create {}", parent.display()))?;
                        }
                        fs::write(out, &bundle)
                            .with_context(|| format!("failed to write {}", out.display()))?;
                    }
                    None => print!("{bundle}"),
                }
                report_summary(&generation, None);
                Ok(())
            }
            Command::Generate(target) => {
                let fields = target.input_settings.load_fields()?;
                let config = target.input_settings.load_config()?;
                let generation = pipeline::generate(&fields, &config)?;
                let written = write_classes(&target.out_dir, &generation, target.keep_existing)?;
                report_summary(&generation, Some(written));
                Ok(())
            }
        }
    }
}

impl InputSettings {
    fn load_fields(&self) -> anyhow::Result<Vec<FieldSpec>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut fields = Vec::new();
        for source_path in source_paths {
            let source = fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read field list {}", source_path.display()))?;
            if self.ndjson {
                for (line_no, line) in source.lines().enumerate() {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let field: FieldSpec = crate::path_de::from_str_with_path(line)
                        .with_context(|| format!("{}:{}", source_path.display(), line_no + 1))?;
                    fields.push(field);
                }
            } else {
                let batch: Vec<FieldSpec> = crate::path_de::from_str_with_path(&source)
                    .with_context(|| format!("{}", source_path.display()))?;
                fields.extend(batch);
            }
        }
        Ok(fields)
    }

    fn load_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match self.config.as_ref() {
            Some(path) => {
                let source = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                crate::path_de::from_str_with_path(&source)
                    .with_context(|| format!("{}", path.display()))?
            }
            None => GeneratorConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut GeneratorConfig) {
        if let Some(package) = &self.package {
            config.target_package = package.clone();
        }
        if let Some(message_id) = &self.message_id {
            config.message_id = message_id.clone();
        }
        if let Some(direction) = self.direction {
            config.direction = direction;
        }
        if let Some(author) = &self.author {
            config.author = author.clone();
        }
        if let Some(root_name) = &self.root_name {
            config.root_class_name = root_name.clone();
        }
        if let Some(validation) = self.validation {
            config.validation = validation;
        }
        if let Some(style) = self.property_style {
            config.property_style = style;
        }
    }
}

// ------------------------------- Writer ----------------------------------- //

fn write_classes(
    out_dir: &Path,
    generation: &Generation,
    keep_existing: bool,
) -> anyhow::Result<usize> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    let mut written = 0usize;
    for (class_name, source) in &generation.classes {
        let path = out_dir.join(format!("{class_name}.java"));
        if path.exists() {
            if keep_existing {
                continue;
            }
            fs::remove_file(&path)
                .with_context(|| format!("failed to replace {}", path.display()))?;
        }
        fs::write(&path, source).with_context(|| format!("failed to write {}", path.display()))?;
        written += 1;
    }
    Ok(written)
}

fn report_summary(generation: &Generation, written: Option<usize>) {
    let mut line = format!(
        "Generated {} classes ({} with fields)",
        generation.total_classes(),
        generation.non_empty_classes()
    );
    if let Some(written) = written {
        line.push_str(&format!(", wrote {written} files"));
    }
    eprintln!("{}", line.green());

    if !generation.empty_classes.is_empty() {
        eprintln!(
            "{}",
            format!(
                "warning: {} classes have no fields (likely a type-column mistake): {}",
                generation.empty_classes.len(),
                generation.empty_classes.join(", ")
            )
            .yellow()
        );
    }
    if !generation.unknown_types.is_empty() {
        eprintln!(
            "{}",
            format!(
                "warning: unrecognized types treated as object references: {}",
                generation.unknown_types.join(", ")
            )
            .yellow()
        );
    }
}

// --------------------------- Internal helpers ----------------------------- //

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //
