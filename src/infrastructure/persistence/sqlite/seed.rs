//! 示例数据
//!
//! 仅在 novels 表为空时写入一部示例小说，重复启动不会产生重复数据。

use super::{
    DbPool, SqliteChapterRepository, SqliteCharacterRepository, SqliteNovelRepository,
    SqliteSettingRepository,
};
use crate::application::ports::{
    ChapterRepositoryPort, CharacterRepositoryPort, NewChapter, NewCharacter, NewNovel, NewSetting,
    NovelRepositoryPort, RepositoryError, SettingRepositoryPort,
};
use crate::domain::novel::{ChapterStatus, CharacterRole, NovelStatus, DEFAULT_TARGET_WORD_COUNT};

/// 写入示例小说，返回新小说的 ID；已有数据时返回 None
pub async fn seed_sample_data(pool: &DbPool) -> Result<Option<i64>, RepositoryError> {
    let novels = SqliteNovelRepository::new(pool.clone());
    if !novels.find_all().await?.is_empty() {
        tracing::debug!("Novels table not empty, skipping seed data");
        return Ok(None);
    }

    let novel = novels
        .insert(&NewNovel {
            title: "رحلة البحث عن الذات".to_string(),
            genre: "دراما".to_string(),
            summary: Some(
                "قصة شاب يغادر قريته بحثًا عن معنى الحياة في المدينة الكبيرة، ليواجه تحديات تغير مجرى حياته."
                    .to_string(),
            ),
            target_word_count: DEFAULT_TARGET_WORD_COUNT,
            status: NovelStatus::Planning,
        })
        .await?;

    SqliteChapterRepository::new(pool.clone())
        .insert(&NewChapter {
            novel_id: novel.id,
            title: "الفصل الأول: الوداع".to_string(),
            content: Some(
                "<p>كانت الشمس تغرب خلف التلال، معلنة نهاية يوم وبداية رحلة...</p>".to_string(),
            ),
            order_index: Some(0),
            status: ChapterStatus::Draft,
        })
        .await?;

    SqliteCharacterRepository::new(pool.clone())
        .insert(&NewCharacter {
            novel_id: novel.id,
            name: "أحمد".to_string(),
            role: CharacterRole::Protagonist,
            description: Some("شاب طموح في العشرينات من عمره، يحلم بأن يصبح كاتبًا.".to_string()),
            traits: vec!["طموح".to_string(), "حنون".to_string(), "متردد".to_string()],
        })
        .await?;

    SqliteSettingRepository::new(pool.clone())
        .insert(&NewSetting {
            novel_id: novel.id,
            name: "القرية".to_string(),
            description: Some(
                "مكان هادئ وبسيط حيث نشأ أحمد، مليء بالمزارع والبيوت القديمة.".to_string(),
            ),
        })
        .await?;

    tracing::info!(novel_id = novel.id, "Seed data inserted");

    Ok(Some(novel.id))
}
