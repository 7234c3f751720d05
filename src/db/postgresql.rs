use tokio_postgres::{NoTls, SimpleQueryMessage};
use tracing::{error, info};

use crate::{
    generator::{InsertScript, StatementGenerator},
    Error, Query,
};

use super::conversion::ToValue;

pub struct PostgreSQL {
    url: String,
}

impl PostgreSQL {
    pub fn new(url: String) -> Self {
        PostgreSQL { url }
    }
}

impl Query for PostgreSQL {
    async fn export(
        &self,
        query: &str,
        generator: &StatementGenerator,
    ) -> Result<InsertScript, Error> {
        let (client, connection) = tokio_postgres::connect(self.url.as_str(), NoTls)
            .await
            .map_err(|e| Error::connect(&self.url, e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| Error::connect(&self.url, e))?;
        info!("Connected to PostgreSQL");

        // Preparing describes the result columns without running the query.
        let statement = client.prepare(query).await.map_err(Error::query)?;
        let columns = statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect::<Vec<String>>();
        let mut script = generator.begin(&columns)?;

        let messages = client.simple_query(query).await.map_err(Error::query)?;
        info!("Executed query: {}", query);

        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                let values = (0..row.len())
                    .map(|i| row.try_get(i).map(|value| value.to_value()))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| script.row_error(e))?;
                script.push_row(&values)?;
            }
        }

        Ok(script.finish())
    }
}
