use slog::Drain;

/// A terminal logger for applications that don't bring their own `slog` setup.
pub fn create_root_logger_for_stdout(application: String) -> slog::Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).use_file_location().build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    slog::Logger::root(drain, slog::o!("Application" => application))
}
