// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::application::runtime::RunContext;
use crate::config::DatabaseConfig;
use crate::domain::errors::{ExportError, Result};
use crate::domain::events::ExportEvent;
use crate::infrastructure::mysql::mysql_table_source::MySqlTableSource;
use mysql::{Conn, OptsBuilder};

/// Opens the single connection a run works with.
pub struct MySqlConnectionManager {
    host: String,
    port: u16,
    user: String,
    /// `None` connects without a password, which is not the same as `Some("")`.
    password: Option<String>,
    database: String,
}

impl MySqlConnectionManager {
    pub fn new(db: &DatabaseConfig) -> Self {
        Self {
            host: db.host.clone(),
            port: db.port,
            user: db.user.clone(),
            password: db.password().map(str::to_string),
            database: db.database.clone(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }

    fn opts(&self) -> OptsBuilder {
        OptsBuilder::new()
            .ip_or_hostname(Some(self.host.clone()))
            .tcp_port(self.port)
            .user(Some(self.user.clone()))
            .pass(self.password.clone())
            .db_name(Some(self.database.clone()))
    }

    /// Connects and authenticates. Any failure here is a `ConnectionError`.
    pub fn connect(&self, ctx: &RunContext) -> Result<MySqlTableSource> {
        let endpoint = self.endpoint();
        ctx.emit(ExportEvent::Connecting {
            endpoint: endpoint.clone(),
        });
        let conn = Conn::new(self.opts())
            .map_err(|e| ExportError::ConnectionError(format!("{}: {}", endpoint, e)))?;
        Ok(MySqlTableSource::new(conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::RecordingSink;
    use log::LevelFilter;

    fn db(password: Option<&str>) -> DatabaseConfig {
        DatabaseConfig {
            host: "db.internal".into(),
            port: 3307,
            user: "exporter".into(),
            password: password.unwrap_or_default().to_string(),
            no_password: password.is_none(),
            database: "shop".into(),
        }
    }

    #[test]
    fn test_endpoint_omits_password() {
        let manager = MySqlConnectionManager::new(&db(Some("hunter2")));
        assert_eq!(manager.endpoint(), "exporter@db.internal:3307/shop");
        assert!(!manager.endpoint().contains("hunter2"));
    }

    #[test]
    fn test_no_password_is_distinct_from_empty() {
        assert_eq!(MySqlConnectionManager::new(&db(None)).password, None);
        assert_eq!(
            MySqlConnectionManager::new(&db(Some(""))).password,
            Some(String::new())
        );
    }

    #[test]
    fn test_unreachable_server_is_connection_error() {
        let mut cfg = db(None);
        cfg.host = "127.0.0.1".into();
        // Port 1 is reserved and refuses connections on loopback.
        cfg.port = 1;
        let sink = RecordingSink::default();
        let ctx = RunContext::new(LevelFilter::Info, Box::new(sink.clone()));
        match MySqlConnectionManager::new(&cfg).connect(&ctx) {
            Err(ExportError::ConnectionError(msg)) => assert!(msg.contains("127.0.0.1:1")),
            Err(other) => panic!("expected ConnectionError, got {:?}", other),
            Ok(_) => panic!("connection to port 1 unexpectedly succeeded"),
        }
        assert_eq!(
            sink.events(),
            vec![ExportEvent::Connecting {
                endpoint: "exporter@127.0.0.1:1/shop".into()
            }]
        );
    }
}
