use nc_news::db;

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    let pool = db::init_pool().expect("Failed to create database pool");
    {
        let mut conn = pool
            .get()
            .expect("Failed to check out a connection for migrations");
        db::run_migrations(&mut conn).expect("Failed to run database migrations");
    }
    let _ = nc_news::rocket(pool).launch().await?;
    Ok(())
}
