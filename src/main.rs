use chrono::Local;
use site_portal::api::dashboard::PortalView;
use site_portal::config::Config;
use site_portal::db::{init_session, init_store};
use site_portal::seed::seed_if_empty;
use tracing::{debug, info, warn};
use tracing_appender::rolling;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!("Portal starting...");

    let store = init_store(&config);
    let session = init_session(&config);

    let changes = store.subscribe(|| {
        debug!("Store changed");
        Ok(())
    });

    if config.seed_demo_data && seed_if_empty(&store).await {
        info!("First run, demo roster loaded");
    }

    let view = PortalView::load(&store).await;
    let today = Local::now().date_naive();

    match session.restore(&store).await {
        Some(user) => {
            println!("Signed in as {} ({})", user.name, user.role.title());
            let open_tasks = view.tasks_for(&user.id).count();
            println!(
                "  {} task(s), {}",
                open_tasks,
                if view.is_checked_in(&user.id, today) {
                    "checked in"
                } else {
                    "not checked in"
                }
            );
        }
        None => println!("No active session"),
    }

    println!(
        "{} staff ({} field), {} task(s) across {} site(s), {} instruction(s), {} attendance record(s), {} salary record(s)",
        view.users.len(),
        view.employees().count(),
        view.tasks.len(),
        view.live_sites(),
        view.instructions.len(),
        view.attendance.len(),
        view.salaries.len(),
    );
    println!("Estimated monthly payroll: {:.2}", view.total_payroll());
    for log in view.recent_attendance(10) {
        let out = log
            .check_out_time
            .map(|t| t.to_string())
            .unwrap_or_else(|| "on site".to_string());
        println!("  {} {} in {} out {}", log.date, log.employee_name, log.check_in_time, out);
    }
    for instruction in view.latest_instructions(3) {
        println!("  [{}] {}: {}", instruction.priority, instruction.author, instruction.content);
    }

    if !changes.unsubscribe() {
        warn!("Change listener was already removed");
    }
    info!("Portal stopped");
    Ok(())
}
