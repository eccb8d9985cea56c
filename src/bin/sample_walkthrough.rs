use container_analysis_samples::adapters::clients_from_config;
use container_analysis_samples::core::samples;
use container_analysis_samples::utils::error::Result;
use container_analysis_samples::utils::logger;
use container_analysis_samples::utils::validation::Validate;
use container_analysis_samples::{AnalysisClient, PubsubClient, Settings};
use std::time::Duration;

/// occurrence 索引是最終一致的，計數需要重試
const TRY_LIMIT: usize = 20;
const SLEEP: Duration = Duration::from_secs(1);
const LISTEN_WINDOW: Duration = Duration::from_secs(5);

/// 本次執行建立的資源，結束時一律清掉
#[derive(Default)]
struct Created {
    note_id: Option<String>,
    subscription_id: Option<String>,
    occurrence_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日誌
    logger::init_cli_logger(false);

    println!("🚀 Container analysis sample walkthrough");

    let settings = Settings::from_env()?;
    settings.validate()?;
    let (analysis, pubsub) = clients_from_config(&settings)?;
    println!("✅ Configuration loaded for project {}", settings.project_id);

    let mut created = Created::default();
    let outcome = walkthrough(&settings, &analysis, &pubsub, &mut created).await;
    cleanup(&settings, &analysis, &pubsub, &created).await;

    match &outcome {
        Ok(()) => println!("\n🎉 Walkthrough finished"),
        Err(e) => println!("\n❌ Walkthrough failed: {}", e.user_friendly_message()),
    }
    outcome
}

async fn walkthrough(
    settings: &Settings,
    analysis: &AnalysisClient,
    pubsub: &PubsubClient,
    created: &mut Created,
) -> Result<()> {
    let project = settings.project_id.as_str();
    let timestamp = chrono::Utc::now().timestamp();
    let note_id = format!("note-{}-walkthrough", timestamp);
    let image_url = format!("www.{}-walkthrough.com", timestamp);
    let subscription_id = format!("walkthrough-{}", timestamp);

    let note = samples::create_note(analysis, &note_id, project).await?;
    created.note_id = Some(note_id.clone());
    println!("  - note: {}", note.name);

    samples::create_topic_subscription(
        pubsub,
        &subscription_id,
        project,
        &settings.occurrence_topic,
    )
    .await?;
    created.subscription_id = Some(subscription_id.clone());
    println!(
        "  - subscription: {} on {}",
        subscription_id, settings.occurrence_topic
    );

    let before = samples::get_occurrences_for_image(analysis, &image_url, project).await?;
    let occurrence = samples::create_occurrence(analysis, &image_url, &note_id, project).await?;
    created.occurrence_name = Some(occurrence.name.clone());
    println!("  - occurrence: {}", occurrence.name);

    let mut after = before;
    for _ in 0..TRY_LIMIT {
        after = samples::get_occurrences_for_image(analysis, &image_url, project).await?;
        if after > before {
            break;
        }
        tokio::time::sleep(SLEEP).await;
    }
    println!("📊 Occurrences on {}: {} -> {}", image_url, before, after);

    let received = samples::pubsub(pubsub, &subscription_id, LISTEN_WINDOW, project).await?;
    println!("📨 Notifications received in {:?}: {}", LISTEN_WINDOW, received);

    Ok(())
}

/// 依建立的反向順序刪除；失敗只記錄，不蓋掉主流程的結果
async fn cleanup(
    settings: &Settings,
    analysis: &AnalysisClient,
    pubsub: &PubsubClient,
    created: &Created,
) {
    let project = settings.project_id.as_str();

    if let Some(name) = &created.occurrence_name {
        if let Err(e) = samples::delete_occurrence(analysis, name).await {
            tracing::warn!("Failed to delete occurrence {}: {}", name, e);
        }
    }
    if let Some(id) = &created.subscription_id {
        if let Err(e) = samples::delete_subscription(pubsub, id, project).await {
            tracing::warn!("Failed to delete subscription {}: {}", id, e);
        }
    }
    if let Some(id) = &created.note_id {
        if let Err(e) = samples::delete_note(analysis, id, project).await {
            tracing::warn!("Failed to delete note {}: {}", id, e);
        }
    }
}
