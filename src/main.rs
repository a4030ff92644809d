use clap::{Arg, ArgAction, Command};
use std::error::Error;
use std::path::PathBuf;
use std::str::FromStr;

use fansync::logging::init_tracing;
use fansync::progress::CliProgress;
use fansync::{
	CancelToken, CompareMethod, Engine, HashAlgorithm, NoCallbacks, SyncObserver, SyncOptions,
};

fn main() -> Result<(), Box<dyn Error>> {
	init_tracing();

	let matches = Command::new("fansync")
		.version(env!("CARGO_PKG_VERSION"))
		.about("Sync a set of files to many destination directories at once")
		.subcommand_required(true)
		.subcommand(
			Command::new("sync")
				.about("Copy or move sources to every destination")
				.arg(
					Arg::new("source")
						.required(true)
						.action(ArgAction::Append)
						.num_args(1..)
						.help("Source files"),
				)
				.arg(
					Arg::new("dest")
						.short('d')
						.long("dest")
						.required(true)
						.action(ArgAction::Append)
						.value_name("DIR")
						.help("Destination directory (repeatable)"),
				)
				.arg(
					Arg::new("move")
						.short('m')
						.long("move")
						.action(ArgAction::SetTrue)
						.help("Delete each source after all destinations succeeded"),
				)
				.arg(
					Arg::new("compare")
						.short('c')
						.long("compare")
						.value_name("METHOD")
						.help("Skip policy: none, size, mtime, size-mtime, hash"),
				)
				.arg(
					Arg::new("hash")
						.long("hash")
						.value_name("ALG")
						.help("Digest algorithm: blake3, sha256, xxh3"),
				)
				.arg(
					Arg::new("verify")
						.long("verify")
						.action(ArgAction::SetTrue)
						.help("Verify each destination digest after copy"),
				)
				.arg(
					Arg::new("quiet")
						.short('q')
						.long("quiet")
						.action(ArgAction::SetTrue)
						.help("Suppress progress output"),
				),
		)
		.subcommand(
			Command::new("hash")
				.about("Print the digest of a file")
				.arg(Arg::new("file").required(true).help("File to hash"))
				.arg(
					Arg::new("hash")
						.long("hash")
						.value_name("ALG")
						.help("Digest algorithm: blake3, sha256, xxh3"),
				),
		)
		.get_matches();

	let runtime = tokio::runtime::Runtime::new()?;

	if let Some(sub_matches) = matches.subcommand_matches("sync") {
		let sources: Vec<PathBuf> = sub_matches
			.get_many::<String>("source")
			.into_iter()
			.flatten()
			.map(PathBuf::from)
			.collect();
		let destinations: Vec<PathBuf> = sub_matches
			.get_many::<String>("dest")
			.into_iter()
			.flatten()
			.map(PathBuf::from)
			.collect();

		let options = SyncOptions {
			move_source: sub_matches.get_flag("move"),
			verify_destination: sub_matches.get_flag("verify"),
			compare_method: match sub_matches.get_one::<String>("compare") {
				Some(method) => CompareMethod::from_str(method)?,
				None => CompareMethod::default(),
			},
			hash_algorithm: match sub_matches.get_one::<String>("hash") {
				Some(alg) => HashAlgorithm::from_str(alg)?,
				None => HashAlgorithm::default(),
			},
		};

		let quiet = sub_matches.get_flag("quiet");
		let cancel = CancelToken::new();

		let result = runtime.block_on(async {
			// Ctrl-C requests cooperative cancellation; the in-flight
			// copy finishes first.
			let signal_token = cancel.clone();
			tokio::spawn(async move {
				if tokio::signal::ctrl_c().await.is_ok() {
					eprintln!("\nInterrupt received, finishing current item...");
					signal_token.cancel();
				}
			});

			let engine = Engine::new();
			let observer: Box<dyn SyncObserver> =
				if quiet { Box::new(NoCallbacks) } else { Box::new(CliProgress::new()) };
			engine.sync(&sources, &destinations, &options, observer.as_ref(), &cancel).await
		});

		if result.items_failed > 0 || result.store_failure_abort || result.cancelled {
			std::process::exit(1);
		}
	} else if let Some(sub_matches) = matches.subcommand_matches("hash") {
		let file = PathBuf::from(sub_matches.get_one::<String>("file").expect("required arg"));
		let algorithm = match sub_matches.get_one::<String>("hash") {
			Some(alg) => HashAlgorithm::from_str(alg)?,
			None => HashAlgorithm::default(),
		};

		let digest = runtime.block_on(fansync::hasher::hash_file(&file, algorithm))?;
		println!("{}  {}", digest, file.display());
	}

	Ok(())
}

// vim: ts=4
