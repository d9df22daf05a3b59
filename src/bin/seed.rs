use chrono::Utc;
use workshop_hub::{
    config::AppConfig,
    models::{CatalogueItem, Customer, JobCard, Role, User},
    services::auth_service::hash_password,
    store::JsonStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let store = JsonStore::open(&config.data_dir).await?;

    let admin_id = ensure_user(&store, "admin", "admin@example.com", "admin123", Role::Admin).await?;
    let user_id = ensure_user(&store, "user", "user@example.com", "user123", Role::User).await?;
    seed_jobs(&store).await?;
    seed_customers(&store).await?;
    seed_catalogue(&store).await?;

    println!(
        "Seed completed in {}. Admin ID: {admin_id}, User ID: {user_id}",
        config.data_dir.display()
    );
    Ok(())
}

async fn ensure_user(
    store: &JsonStore,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<u64> {
    let mut users = store.lock::<User>().await?;
    if let Some(existing) = users.get(username) {
        println!("User {username} already present");
        return Ok(existing.id);
    }

    let id = users.items.iter().map(|u| u.id).max().unwrap_or(0) + 1;
    users.items.push(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password)?,
        role,
        face_image: None,
        person_id: None,
        created_at: Utc::now(),
    });
    users.commit().await?;

    println!("Ensured user {username} (role={})", role.as_str());
    Ok(id)
}

async fn seed_jobs(store: &JsonStore) -> anyhow::Result<()> {
    let jobs = [
        ("JC1234", "In Progress", "Brake pad replacement", "Ali"),
        ("JC5678", "Completed", "Engine oil service", "Mei Ling"),
    ];

    let mut existing = store.lock::<JobCard>().await?;
    for (job_id, status, remarks, assigned_to) in jobs {
        if existing.contains(job_id) {
            continue;
        }
        existing.items.push(JobCard {
            job_id: job_id.to_string(),
            status: status.to_string(),
            remarks: remarks.to_string(),
            assigned_to: assigned_to.to_string(),
            created_at: Utc::now(),
        });
    }
    existing.commit().await?;

    println!("Seeded job cards");
    Ok(())
}

async fn seed_customers(store: &JsonStore) -> anyhow::Result<()> {
    let customers = [("C001", "Ahmad Razak", 4, 0), ("C002", "Siti Aminah", 7, 1)];

    let mut existing = store.lock::<Customer>().await?;
    for (customer_id, name, purchases, redeemed) in customers {
        if existing.contains(customer_id) {
            continue;
        }
        existing.items.push(Customer {
            customer_id: customer_id.to_string(),
            name: name.to_string(),
            purchases,
            redeemed,
        });
    }
    existing.commit().await?;

    println!("Seeded reward customers");
    Ok(())
}

async fn seed_catalogue(store: &JsonStore) -> anyhow::Result<()> {
    let parts = [
        ("P1", "Spark Plug", "Engine", 12.5, 40, "Iridium spark plug"),
        ("P2", "Brake Pad Set", "Brakes", 45.0, 12, "Front ceramic brake pads"),
        ("P3", "Oil Filter", "Engine", 8.9, 3, "Spin-on oil filter"),
        ("P4", "Wiper Blade", "Accessories", 15.0, 0, "22 inch wiper blade"),
        ("P10", "Brake Disc", "Brakes", 89.0, 6, "Vented front brake disc"),
    ];

    let mut existing = store.lock::<CatalogueItem>().await?;
    for (part_id, name, category, price, stock, description) in parts {
        if existing.contains(part_id) {
            continue;
        }
        existing.items.push(CatalogueItem {
            part_id: part_id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            price,
            stock,
            description: description.to_string(),
            image: None,
        });
    }
    existing.commit().await?;

    println!("Seeded catalogue");
    Ok(())
}
