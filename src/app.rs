use std::time::Duration;

use anyhow::Result;
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    time::{interval, timeout, MissedTickBehavior},
};

use crate::{
    board::{CardHandle, HtmlBoard, JobBoard},
    config::AppConfig,
    console::{self, Command},
    db::{self, settings::SqliteSettingsStore},
    domain::Toggle,
    filter::{self, navigator::visible_cards, ChangeWatcher},
    infrastructure::{directories::ResolvedPaths, instance_guard::InstanceGuard, shutdown::Shutdown},
    session::{BlockOutcome, DismissOutcome, FilterSession, PhraseOutcome},
    snapshot::{self, PageFeed},
};

type Session = FilterSession<HtmlBoard, SqliteSettingsStore>;
type ConsoleLines = Lines<BufReader<Stdin>>;

pub struct JobFilterApp {
    _paths: ResolvedPaths,
    _guard: Option<InstanceGuard>,
    config: AppConfig,
    session: Session,
    watcher: ChangeWatcher,
    feed: PageFeed,
    shutdown: Shutdown,
}

impl JobFilterApp {
    pub async fn initialize(
        config: AppConfig,
        paths: ResolvedPaths,
        shutdown: Shutdown,
    ) -> Result<Self> {
        let guard = if config.skip_instance_guard {
            tracing::warn!(
                target: "lifecycle",
                "instance guard skipped because SKIP_INSTANCE_GUARD is set"
            );
            None
        } else {
            Some(InstanceGuard::acquire(&paths)?)
        };

        let pool = db::init_pool(&paths.db_path).await?;
        let store = SqliteSettingsStore::new(pool);

        let (sink, watcher) = filter::observe();
        let board = HtmlBoard::parse("").observed_by(sink);
        let session = FilterSession::start(board, store).await;
        let feed = PageFeed::new(config.snapshot.path.clone());

        Ok(Self {
            _paths: paths,
            _guard: guard,
            config,
            session,
            watcher,
            feed,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let JobFilterApp {
            _paths: _,
            _guard,
            config,
            mut session,
            mut watcher,
            mut feed,
            shutdown,
        } = self;

        tracing::info!(
            target: "lifecycle",
            snapshot = %feed.path().display(),
            output = %config.snapshot.output_path.display(),
            "job filter started"
        );

        let mut shutdown_listener = shutdown.subscribe();
        tokio::select! {
            res = feed.wait_until_present(config.snapshot.wait_timeout, config.snapshot.poll_interval) => {
                if let Err(err) = res {
                    tracing::info!(
                        target: "snapshot",
                        path = %feed.path().display(),
                        error = %err,
                        "snapshot not available yet; still watching"
                    );
                }
            }
            _ = shutdown_listener.notified() => {}
        }

        let mut ticker = interval(config.snapshot.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut console: Option<ConsoleLines> = Some(BufReader::new(tokio::io::stdin()).lines());
        let mut opened_first = !config.navigation.auto_open_first;

        while !shutdown_listener.is_triggered() {
            tokio::select! {
                _ = shutdown_listener.notified() => {
                    tracing::info!(target: "lifecycle", "shutdown requested");
                }
                _ = ticker.tick() => {
                    match feed.poll().await {
                        Ok(Some(html)) => {
                            session.board_mut().replace_document(&html);
                            tracing::info!(
                                target: "snapshot",
                                bytes = html.len(),
                                cards = session.board().cards().len(),
                                "page re-rendered"
                            );
                            if config.navigation.highlight_skills {
                                session.board().highlight_description();
                            }
                        }
                        Ok(None) => {}
                        Err(err) => {
                            tracing::warn!(target: "snapshot", error = %err, "failed to read snapshot");
                        }
                    }
                }
                Some(batch) = watcher.next_batch() => {
                    let summary = session.reclassify();
                    tracing::info!(
                        target: "watcher",
                        records = batch.records,
                        shown = summary.shown,
                        hidden = summary.hidden,
                        skipped = summary.skipped,
                        "reclassified after page change"
                    );
                    if !opened_first && summary.scanned > summary.skipped {
                        opened_first = true;
                        let opened = session.open_next(None);
                        after_navigation(&config, &session, opened.as_ref());
                    }
                    render(&config, &session).await;
                }
                Some(line) = read_line(&mut console) => {
                    match console::parse(&line) {
                        Ok(Some(command)) => {
                            execute(command, &config, &mut session).await;
                            render(&config, &session).await;
                        }
                        Ok(None) => {}
                        Err(err) => println!("{err}"),
                    }
                }
            }
        }

        render(&config, &session).await;
        let close_timeout = Duration::from_secs(5);
        if timeout(close_timeout, session.store().close()).await.is_err() {
            tracing::warn!(
                target: "store",
                "settings store did not close within {:?}",
                close_timeout
            );
        }
        tracing::info!(target: "lifecycle", "job filter stopped");
        Ok(())
    }
}

/// Next console line; pends forever once stdin is closed.
async fn read_line(console: &mut Option<ConsoleLines>) -> Option<String> {
    let Some(lines) = console.as_mut() else {
        return std::future::pending().await;
    };
    let read = lines.next_line().await;
    match read {
        Ok(Some(line)) => Some(line),
        Ok(None) => {
            tracing::debug!(target: "console", "stdin closed; console disabled");
            *console = None;
            None
        }
        Err(err) => {
            tracing::warn!(target: "console", error = %err, "failed to read stdin; console disabled");
            *console = None;
            None
        }
    }
}

async fn execute(command: Command, config: &AppConfig, session: &mut Session) {
    match command {
        Command::Filter(mode) => {
            let summary = session.set_filter(mode).await;
            println!("filter: {mode} ({} shown, {} hidden)", summary.shown, summary.hidden);
        }
        Command::Toggle(toggle) => {
            let (enabled, summary) = session.toggle(toggle).await;
            println!(
                "{}: {} ({} shown, {} hidden)",
                toggle.label(),
                on_off(enabled),
                summary.shown,
                summary.hidden
            );
        }
        Command::Add(phrase) => match session.add_phrase(&phrase).await {
            PhraseOutcome::Added { summary, opened } => {
                println!("blocked \"{}\" ({} hidden)", phrase.trim(), summary.hidden);
                after_navigation(config, session, opened.as_ref());
            }
            PhraseOutcome::Duplicate => println!("\"{}\" is already blocked", phrase.trim()),
            PhraseOutcome::Empty => println!("nothing to block"),
        },
        Command::Remove(phrase) => match session.remove_phrase(&phrase).await {
            Some(summary) => println!("unblocked \"{phrase}\" ({} hidden)", summary.hidden),
            None => println!("\"{phrase}\" is not blocked"),
        },
        Command::Phrases => {
            let phrases = &session.config().blocked_phrases;
            if phrases.is_empty() {
                println!("no blocked phrases");
            }
            for (idx, phrase) in phrases.iter().enumerate() {
                println!("{:>3}. {phrase}", idx + 1);
            }
        }
        Command::Block(id) => {
            let Some(card) = session.find_card(&id) else {
                println!("no card {id} on the page");
                return;
            };
            match session.block_card(&card).await {
                BlockOutcome::Blocked {
                    phrase,
                    summary,
                    opened,
                } => {
                    println!("blocked \"{phrase}\" ({} hidden)", summary.hidden);
                    after_navigation(config, session, opened.as_ref());
                }
                BlockOutcome::AlreadyBlocked(phrase) => {
                    println!("\"{phrase}\" is already blocked")
                }
                BlockOutcome::Unavailable => {
                    println!("card {} has no block control yet", card.identity)
                }
                BlockOutcome::NoPhrase => {
                    println!("card {} has no title to block", card.identity)
                }
            }
        }
        Command::Dismiss(id) => {
            let Some(card) = session.find_card(&id) else {
                println!("no card {id} on the page");
                return;
            };
            match session.dismiss_card(&card) {
                DismissOutcome::Advanced(opened) => {
                    after_navigation(config, session, opened.as_ref())
                }
                DismissOutcome::NotHooked => {
                    println!("card {} has no intercepted dismiss control", card.identity)
                }
            }
        }
        Command::Next => {
            let opened = session.open_next(None);
            after_navigation(config, session, opened.as_ref());
        }
        Command::Status => print_status(session).await,
        Command::Help => println!("{}", console::HELP),
    }
}

fn after_navigation(config: &AppConfig, session: &Session, opened: Option<&CardHandle>) {
    match opened {
        Some(card) => {
            println!("opened card {}", card.identity);
            if config.navigation.highlight_skills {
                session.board().highlight_description();
            }
        }
        None => println!("no visible card to open"),
    }
}

async fn print_status(session: &Session) {
    let settings = session.config();
    let board = session.board();
    println!("filter:        {}", settings.active_filter);
    for toggle in Toggle::ALL {
        println!(
            "{:<15}{}",
            format!("{}:", toggle.label()),
            on_off(settings.is_enabled(toggle))
        );
    }
    println!("phrases:       {}", settings.blocked_phrases.len());
    println!(
        "cards:         {} visible of {}",
        visible_cards(board).len(),
        board.cards().len()
    );
    match session.store().updated_at().await {
        Ok(Some(ts)) => println!("saved:         {}", ts.format("%Y-%m-%d %H:%M:%S UTC")),
        Ok(None) => println!("saved:         never"),
        Err(err) => tracing::warn!(target: "store", error = %err, "failed to read settings timestamp"),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

async fn render(config: &AppConfig, session: &Session) {
    let path = &config.snapshot.output_path;
    if let Err(err) = snapshot::write_annotated(path, &session.board().html()).await {
        tracing::warn!(target: "snapshot", error = %err, path = %path.display(), "failed to write filtered page");
    }
}
