use futures::StreamExt;
use mysql_async::{prelude::Queryable, Row};
use tracing::{info, warn};

use crate::{
    generator::{InsertScript, StatementGenerator},
    value::Value,
    Error, Query,
};

use super::conversion::ToValue;

pub struct MySQL {
    url: String,
}

impl MySQL {
    pub fn new(url: String) -> Self {
        MySQL { url }
    }

    fn convert_row(row: &Row) -> Vec<Value> {
        (0..row.len())
            .map(|i| row.as_ref(i).map_or(Value::Null, ToValue::to_value))
            .collect()
    }
}

impl Query for MySQL {
    async fn export(
        &self,
        query: &str,
        generator: &StatementGenerator,
    ) -> Result<InsertScript, Error> {
        let pool = mysql_async::Pool::from_url(self.url.as_str())
            .map_err(|e| Error::connect(&self.url, e))?;
        let mut conn = pool
            .get_conn()
            .await
            .map_err(|e| Error::connect(&self.url, e))?;
        conn.ping().await.map_err(|e| Error::connect(&self.url, e))?;
        info!("Connected to MySQL");

        let script = {
            let mut result = conn.query_iter(query).await.map_err(Error::query)?;
            let mut stream = result
                .stream::<Row>()
                .await
                .map_err(Error::query)?
                .ok_or_else(|| Error::query("query returned no result set"))?;
            info!("Executed query: {}", query);

            let columns = stream
                .columns()
                .iter()
                .map(|column| column.name_str().into_owned())
                .collect::<Vec<String>>();
            let mut script = generator.begin(&columns)?;

            while let Some(row) = stream.next().await {
                let row = row.map_err(|e| script.row_error(e))?;
                script.push_row(&MySQL::convert_row(&row))?;
            }
            script.finish()
        };

        drop(conn);
        if let Err(e) = pool.disconnect().await {
            warn!("failed to close MySQL pool: {}", e);
        }
        Ok(script)
    }
}
