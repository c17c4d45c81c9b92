use std::fs;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use foodgram::config::ServerConfig;
use foodgram::db::establish_connection_pool;
use foodgram::media::{AvatarStore, FsImageStore};
use foodgram::repository::DieselRepository;
use foodgram::routes::ingredients::{api_get_ingredient, api_list_ingredients};
use foodgram::routes::recipes::{
    api_add_favorite, api_add_to_cart, api_create_recipe, api_delete_recipe,
    api_download_shopping_cart, api_get_recipe, api_get_short_link, api_list_recipes,
    api_remove_favorite, api_remove_from_cart, api_update_recipe,
};
use foodgram::routes::short_links::follow_short_link;
use foodgram::routes::tags::{api_get_tag, api_list_tags};
use foodgram::routes::users::{
    api_current_user, api_get_user, api_list_subscriptions, api_remove_avatar, api_set_avatar,
    api_subscribe, api_unsubscribe,
};
use foodgram::short_code::ShortCodeGenerator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &config.secret {
        Some(secret) => match Key::try_from(secret.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                log::error!("SECRET_KEY is unusable: {e}");
                std::process::exit(1);
            }
        },
        None => Key::generate(),
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    fs::create_dir_all(&config.media_root)?;
    let images = web::Data::new(FsImageStore::new(&config.media_root, &config.media_url));
    let avatars = web::Data::new(AvatarStore::new(&config.media_root, &config.media_url));
    let codes = web::Data::new(ShortCodeGenerator::from_entropy());

    let domain = config.domain.clone();
    let media_url = config.media_url.clone();
    let media_root = config.media_root.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new(&media_url, &media_root))
            .service(api_list_tags)
            .service(api_get_tag)
            .service(api_list_ingredients)
            .service(api_get_ingredient)
            .service(api_download_shopping_cart)
            .service(api_list_recipes)
            .service(api_create_recipe)
            .service(api_get_recipe)
            .service(api_update_recipe)
            .service(api_delete_recipe)
            .service(api_add_favorite)
            .service(api_remove_favorite)
            .service(api_add_to_cart)
            .service(api_remove_from_cart)
            .service(api_get_short_link)
            .service(api_list_subscriptions)
            .service(api_subscribe)
            .service(api_unsubscribe)
            .service(api_current_user)
            .service(api_get_user)
            .service(api_set_avatar)
            .service(api_remove_avatar)
            .service(follow_short_link)
            .app_data(web::Data::new(repo.clone()))
            .app_data(images.clone())
            .app_data(avatars.clone())
            .app_data(codes.clone())
    })
    .bind((config.address.as_str(), config.port))?
    .run()
    .await
}
