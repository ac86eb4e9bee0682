use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use film_renamer_core::{
    app_paths, apply_plan, generate_plan, load_config, save_config, undo_last, ExifToolSession,
    NamingStyle, PlanOptions, RenamePlan,
};

#[derive(Debug, Parser)]
#[command(name = "film-renamer-cli")]
#[command(about = "写真・動画のファイル名を撮影日時で一括リネームします")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Undo,
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    Init,
}

#[derive(Debug, Args)]
struct RenameArgs {
    /// 処理対象のディレクトリ
    #[arg(short = 'd', long)]
    directory: String,
    /// ファイルごとの全メタデータを表示する
    #[arg(long, default_value_t = false)]
    debug: bool,
    /// 計画の表示のみでリネームは行わない
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// 命名規則(未指定なら設定ファイルに従う)
    #[arg(long, value_enum)]
    naming: Option<NamingArg>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NamingArg {
    Prefixed,
    Bare,
}

impl From<NamingArg> for NamingStyle {
    fn from(value: NamingArg) -> Self {
        match value {
            NamingArg::Prefixed => NamingStyle::Prefixed,
            NamingArg::Bare => NamingStyle::Bare,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Undo => cmd_undo(),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Init => cmd_config_init(),
        },
    }
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let config = load_config()?;
    let options = PlanOptions {
        root: args.directory.into(),
        rules: config.rules,
        naming: args.naming.map(Into::into).unwrap_or(config.naming),
        debug: args.debug,
    };

    let mut session = ExifToolSession::new()?;
    let plan = generate_plan(&options, &mut session)?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Table => {
            print_table(&plan);
        }
    }

    if args.dry_run {
        eprintln!("dry-runモード: 実ファイルは変更していません。");
        return Ok(());
    }

    let result = apply_plan(&plan)?;
    for failure in &result.failures {
        eprintln!("失敗: {} ({})", failure.path.display(), failure.message);
    }
    eprintln!(
        "適用完了: {}件 (変更なし {}件, 失敗 {}件)",
        result.applied,
        result.unchanged,
        result.failures.len()
    );

    Ok(())
}

fn cmd_undo() -> Result<()> {
    let result = undo_last()?;
    println!("取り消し完了: {}件", result.restored);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    // 現在有効な設定(未作成ならデフォルト)をファイルとして書き出す
    let config = load_config()?;
    save_config(&config)?;
    let paths = app_paths()?;
    println!("設定ファイルを書き出しました: {}", paths.config_path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn print_table(plan: &RenamePlan) {
    println!("元ファイル -> 新ファイル");
    for candidate in &plan.candidates {
        println!(
            "{} -> {}",
            candidate.original_path.display(),
            candidate.target_path.display()
        );
    }
    for skip in &plan.skipped {
        println!("スキップ: {} ({})", skip.path.display(), skip.reason);
    }

    println!(
        "\n集計: scanned={} photo={} video={} skipped={} planned={} unchanged={}",
        plan.stats.scanned_files,
        plan.stats.photo_files,
        plan.stats.video_files,
        plan.stats.skipped,
        plan.stats.planned,
        plan.stats.unchanged
    );
}
