use log::info;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use std::error::Error;

use crate::config::AppConfig;
use crate::post::post_model::Post;
use crate::user::model::User;

pub async fn connect_to_mongo(config: &AppConfig) -> Result<Database, Box<dyn Error>> {
    let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
    client_options.app_name = Some("social_feed_api".to_string());

    let client = Client::with_options(client_options)?;

    // Ping the server to see if you can connect to the cluster
    client.database("admin").run_command(doc! {"ping": 1}).await?;

    info!("Connected successfully to MongoDB");

    let db = client.database(&config.database_name);
    ensure_indexes(&db).await?;
    Ok(db)
}

async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    db.collection::<User>("users")
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    db.collection::<Post>("posts")
        .create_index(IndexModel::builder().keys(doc! { "createdAt": -1 }).build())
        .await?;

    Ok(())
}
