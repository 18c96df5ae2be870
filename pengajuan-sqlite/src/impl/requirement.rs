use super::fetch_required;
use crate::Db;
use pengajuan_core::{models::RequiredFiles, ports::RequirementRepository};

impl RequirementRepository for Db {
    async fn get_required_files(&self, job_type: &str) -> Result<RequiredFiles, Self::Error> {
        let mut conn = self.reader.acquire().await?;
        fetch_required(&mut conn, job_type).await
    }

    async fn set_required_files(
        &self,
        job_type: &str,
        required: RequiredFiles,
    ) -> Result<(), Self::Error> {
        let mut tx = self.writer.begin().await?;

        sqlx::query("delete from required_file where job_type = ?1")
            .bind(job_type)
            .execute(&mut *tx)
            .await?;

        for (position, (category, file_type)) in required.iter().enumerate() {
            sqlx::query(
                r#"
                insert into
                    required_file (job_type, category, file_type, position)
                values
                    (?1, ?2, ?3, ?4)
                on conflict
                    do nothing
                "#,
            )
            .bind(job_type)
            .bind(category.as_str())
            .bind(file_type)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }
}
