//! Mock data set served in mock/fallback mode and used by `storefront seed`.

use json::json;
use sea_orm::IntoActiveModel;

use crate::{
  entity::{Role, course, product, project, user},
  prelude::*,
};

pub const DEMO_PASSWORD: &str = "demo123";

fn epoch_day(day: i64) -> DateTime {
  // 2024-01-01
  chrono::DateTime::<Utc>::UNIX_EPOCH.naive_utc() + TimeDelta::days(19723 + day)
}

struct ProductRow {
  id: &'static str,
  title: &'static str,
  slug: &'static str,
  description: &'static str,
  price: i32,
  sale_price: Option<i32>,
  image: &'static str,
  freebie: bool,
  featured: bool,
  category: (&'static str, &'static str),
  author: (&'static str, &'static str, &'static str),
  likes: i32,
  rating: f64,
  reviews: i32,
}

const IMG_DASHBOARD: &str = "https://images.unsplash.com/photo-1611224923853-80b023f02d71?w=400&h=300&fit=crop";
const IMG_MOBILE: &str = "https://images.unsplash.com/photo-1512941937669-90a1b58e7e9c?w=400&h=300&fit=crop";
const IMG_LANDING: &str = "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=400&h=300&fit=crop";
const AVATAR_A: &str = "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=150&h=150&fit=crop";
const AVATAR_B: &str = "https://images.unsplash.com/photo-1494790108755-2616b612b587?w=150&h=150&fit=crop";
const AVATAR_C: &str = "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=150&h=150&fit=crop";
const AVATAR_D: &str = "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=150&h=150&fit=crop";

const PRODUCTS: &[ProductRow] = &[
  ProductRow {
    id: "1",
    title: "Dashboard UI Kit",
    slug: "dashboard-ui-kit",
    description: "Complete dashboard UI kit with 50+ components",
    price: 49,
    sale_price: Some(29),
    image: IMG_DASHBOARD,
    freebie: false,
    featured: true,
    category: ("UI Kits", "ui-kits"),
    author: ("Design Studio", AVATAR_A, "design-studio"),
    likes: 234,
    rating: 4.8,
    reviews: 89,
  },
  ProductRow {
    id: "2",
    title: "Mobile App Templates",
    slug: "mobile-app-templates",
    description: "Beautiful mobile app templates for iOS and Android",
    price: 0,
    sale_price: None,
    image: IMG_MOBILE,
    freebie: true,
    featured: true,
    category: ("Mobile", "mobile"),
    author: ("UI Designer", AVATAR_B, "ui-designer"),
    likes: 567,
    rating: 4.9,
    reviews: 234,
  },
  ProductRow {
    id: "3",
    title: "E-commerce Website Kit",
    slug: "ecommerce-website-kit",
    description: "Complete e-commerce solution with shopping cart",
    price: 89,
    sale_price: Some(59),
    image: "https://images.unsplash.com/photo-1556742049-0cfed4f6a45d?w=400&h=300&fit=crop",
    freebie: false,
    featured: false,
    category: ("Web Templates", "web-templates"),
    author: ("Web Studio", AVATAR_C, "web-studio"),
    likes: 423,
    rating: 4.7,
    reviews: 156,
  },
  ProductRow {
    id: "4",
    title: "Icon Set Collection",
    slug: "icon-set-collection",
    description: "500+ premium icons for your projects",
    price: 0,
    sale_price: None,
    image: IMG_DASHBOARD,
    freebie: true,
    featured: true,
    category: ("Icons", "icons"),
    author: ("Icon Designer", AVATAR_D, "icon-designer"),
    likes: 890,
    rating: 4.6,
    reviews: 345,
  },
  ProductRow {
    id: "5",
    title: "Landing Page Template",
    slug: "landing-page-template",
    description: "Modern landing page template with animations",
    price: 39,
    sale_price: None,
    image: IMG_LANDING,
    freebie: false,
    featured: false,
    category: ("Web Templates", "web-templates"),
    author: ("Creative Agency", AVATAR_A, "creative-agency"),
    likes: 312,
    rating: 4.5,
    reviews: 78,
  },
  ProductRow {
    id: "6",
    title: "Social Media Kit",
    slug: "social-media-kit",
    description: "Complete social media templates and graphics",
    price: 25,
    sale_price: None,
    image: "https://images.unsplash.com/photo-1611162617474-5b21e879e113?w=400&h=300&fit=crop",
    freebie: false,
    featured: true,
    category: ("Graphics", "graphics"),
    author: ("Social Designer", AVATAR_B, "social-designer"),
    likes: 678,
    rating: 4.8,
    reviews: 234,
  },
  ProductRow {
    id: "7",
    title: "Admin Dashboard",
    slug: "admin-dashboard",
    description: "Professional admin dashboard with charts",
    price: 79,
    sale_price: Some(49),
    image: "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=400&h=300&fit=crop",
    freebie: false,
    featured: false,
    category: ("UI Kits", "ui-kits"),
    author: ("Dashboard Pro", AVATAR_C, "dashboard-pro"),
    likes: 445,
    rating: 4.7,
    reviews: 167,
  },
  ProductRow {
    id: "8",
    title: "Mobile UI Components",
    slug: "mobile-ui-components",
    description: "Essential mobile UI components library",
    price: 0,
    sale_price: None,
    image: IMG_MOBILE,
    freebie: true,
    featured: false,
    category: ("Mobile", "mobile"),
    author: ("Mobile Expert", AVATAR_D, "mobile-expert"),
    likes: 723,
    rating: 4.6,
    reviews: 289,
  },
  ProductRow {
    id: "9",
    title: "Presentation Template",
    slug: "presentation-template",
    description: "Modern presentation template with 50+ slides",
    price: 35,
    sale_price: None,
    image: IMG_LANDING,
    freebie: false,
    featured: true,
    category: ("Presentations", "presentations"),
    author: ("Slide Master", AVATAR_A, "slide-master"),
    likes: 356,
    rating: 4.9,
    reviews: 123,
  },
  ProductRow {
    id: "10",
    title: "Wireframe Kit",
    slug: "wireframe-kit",
    description: "Complete wireframe kit for prototyping",
    price: 0,
    sale_price: None,
    image: IMG_DASHBOARD,
    freebie: true,
    featured: false,
    category: ("UI Kits", "ui-kits"),
    author: ("UX Designer", AVATAR_B, "ux-designer"),
    likes: 512,
    rating: 4.4,
    reviews: 198,
  },
];

pub fn products() -> Vec<product::Model> {
  PRODUCTS
    .iter()
    .zip(0..)
    .map(|(row, day)| product::Model {
      id: row.id.into(),
      title: row.title.into(),
      slug: row.slug.into(),
      description: row.description.into(),
      price: row.price,
      sale_price: row.sale_price,
      image_url: row.image.into(),
      freebie: row.freebie,
      featured: row.featured,
      category_title: row.category.0.into(),
      category_slug: row.category.1.into(),
      author_name: row.author.0.into(),
      author_image: Some(row.author.1.into()),
      author_slug: row.author.2.into(),
      likes: row.likes,
      rating: row.rating,
      reviews_count: row.reviews,
      downloads: 0,
      created_at: epoch_day(day),
    })
    .collect()
}

fn lesson(title: &str, description: &str, duration: &str, order: u32) -> json::Value {
  json!({
    "title": title,
    "description": description,
    "duration": duration,
    "order": order,
    "free": true,
  })
}

#[allow(clippy::too_many_arguments)]
fn course_row(
  n: i64,
  title: &str,
  slug: &str,
  description: &str,
  thumbnail: &str,
  instructor: (&str, &str),
  duration: &str,
  difficulty: &str,
  category: &str,
  rating: f64,
  enrolled: i32,
  price: i32,
  featured: bool,
  lessons: Vec<json::Value>,
) -> course::Model {
  course::Model {
    id: format!("course-{n}"),
    title: title.into(),
    slug: slug.into(),
    description: description.into(),
    thumbnail: thumbnail.into(),
    instructor_name: instructor.0.into(),
    instructor_bio: instructor.1.into(),
    duration: duration.into(),
    difficulty: difficulty.into(),
    category: category.into(),
    rating,
    enrolled,
    price,
    featured,
    published: true,
    lessons: json::Value::Array(lessons),
    created_at: epoch_day(n),
  }
}

pub fn courses() -> Vec<course::Model> {
  vec![
    course_row(
      1,
      "Complete Game Development with Godot",
      "complete-game-development-with-godot",
      "Learn to create 2D and 3D games from scratch using the Godot engine",
      "https://images.unsplash.com/photo-1551103782-8ab07afd45c1?w=400&h=225&fit=crop",
      ("Alex Johnson", "Game developer with 8+ years of experience"),
      "12 hours",
      "Beginner",
      "Game Development",
      4.8,
      1247,
      0,
      true,
      vec![
        lesson(
          "Introduction to Godot",
          "Setting up your development environment",
          "15 minutes",
          1,
        ),
        lesson(
          "Creating Your First Scene",
          "Understanding nodes and scenes in Godot",
          "25 minutes",
          2,
        ),
      ],
    ),
    course_row(
      2,
      "3D Character Modeling in Blender",
      "3d-character-modeling-in-blender",
      "Master the art of creating game-ready characters with professional techniques",
      "https://images.unsplash.com/photo-1633356122102-3fe601e05bd2?w=400&h=225&fit=crop",
      ("Maria Rodriguez", "3D artist specializing in character design"),
      "8 hours",
      "Intermediate",
      "3D Modeling",
      4.9,
      892,
      49,
      false,
      vec![lesson(
        "Blender Interface for Character Modeling",
        "Navigate Blender efficiently for character work",
        "20 minutes",
        1,
      )],
    ),
    course_row(
      3,
      "UI/UX Design for Games",
      "ui-ux-design-for-games",
      "Create intuitive and engaging user interfaces for modern games",
      "https://images.unsplash.com/photo-1611224923853-80b023f02d71?w=400&h=225&fit=crop",
      ("David Kim", "UI/UX designer with focus on game interfaces"),
      "6 hours",
      "Beginner",
      "UI/UX Design",
      4.7,
      634,
      0,
      true,
      vec![lesson(
        "Game UI Design Principles",
        "Understanding player psychology and interface design",
        "30 minutes",
        1,
      )],
    ),
    course_row(
      4,
      "Shader Programming Fundamentals",
      "shader-programming-fundamentals",
      "Write vertex and fragment shaders for stylized game visuals",
      "https://images.unsplash.com/photo-1550745165-9bc0b252726f?w=400&h=225&fit=crop",
      ("Priya Natarajan", "Graphics programmer and technical artist"),
      "10 hours",
      "Advanced",
      "Game Development",
      4.8,
      421,
      79,
      false,
      vec![lesson(
        "The Rendering Pipeline",
        "How a frame gets from scene data to pixels",
        "35 minutes",
        1,
      )],
    ),
    course_row(
      5,
      "Pixel Art for Indie Games",
      "pixel-art-for-indie-games",
      "Design sprites, tilesets and animations with a limited palette",
      "https://images.unsplash.com/photo-1579373903781-fd5c0c30c4cd?w=400&h=225&fit=crop",
      ("Sam Okafor", "Pixel artist on several shipped indie titles"),
      "5 hours",
      "Beginner",
      "2D Art",
      4.6,
      1034,
      0,
      true,
      vec![lesson(
        "Choosing a Palette",
        "Color ramps and readability at small sizes",
        "18 minutes",
        1,
      )],
    ),
    course_row(
      6,
      "Multiplayer Networking Basics",
      "multiplayer-networking-basics",
      "Synchronize game state between players with authoritative servers",
      "https://images.unsplash.com/photo-1538481199705-c710c4e965fc?w=400&h=225&fit=crop",
      ("Lena Fischer", "Network engineer for online games"),
      "9 hours",
      "Intermediate",
      "Game Development",
      4.7,
      568,
      59,
      false,
      vec![lesson(
        "Client/Server Architecture",
        "Why the server owns the game state",
        "22 minutes",
        1,
      )],
    ),
  ]
}

#[allow(clippy::too_many_arguments)]
fn project_row(
  n: i64,
  title: &str,
  slug: &str,
  description: &str,
  year: i32,
  poster: &str,
  studio: &str,
  platforms: &[&str],
  genre: &[&str],
  tech: &[&str],
  featured: bool,
  submitted_by: &str,
  stats: (i32, i32, i32),
) -> project::Model {
  project::Model {
    id: format!("project-{n}"),
    title: title.into(),
    slug: slug.into(),
    description: description.into(),
    year,
    status: "released".into(),
    poster: poster.into(),
    studio: studio.into(),
    platforms: json!(platforms),
    genre: json!(genre),
    tech: json!(tech),
    featured,
    approved: true,
    submitted_by: submitted_by.into(),
    views: stats.0,
    likes: stats.1,
    downloads: stats.2,
    created_at: epoch_day(n),
  }
}

pub fn projects() -> Vec<project::Model> {
  vec![
    project_row(
      1,
      "Cyber Runners",
      "cyber-runners",
      "A cyberpunk racing game built with Godot 4",
      2024,
      "https://images.unsplash.com/photo-1542751371-adc38448a05e?w=800&h=1200&fit=crop",
      "Neon Games",
      &["PC", "Steam", "Console"],
      &["Racing", "Cyberpunk"],
      &["Godot 4", "C#", "Blender"],
      true,
      "admin",
      (15600, 342, 1250),
    ),
    project_row(
      2,
      "Medieval Legends",
      "medieval-legends",
      "Open-world RPG development insights",
      2024,
      "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=800&h=1200&fit=crop",
      "Forge Studios",
      &["PC", "PlayStation", "Xbox"],
      &["RPG", "Open World"],
      &["Unity", "C#", "Maya"],
      true,
      "admin",
      (28900, 567, 2100),
    ),
    project_row(
      3,
      "Quantum Puzzle",
      "quantum-puzzle",
      "Innovative puzzle mechanics using quantum physics concepts",
      2023,
      "https://images.unsplash.com/photo-1633356122102-3fe601e05bd2?w=800&h=1200&fit=crop",
      "Mind Bender Games",
      &["PC", "Mobile"],
      &["Puzzle", "Sci-Fi"],
      &["Godot 3.5", "GDScript"],
      false,
      "user",
      (12400, 289, 890),
    ),
    project_row(
      4,
      "Lantern Keeper",
      "lantern-keeper",
      "Atmospheric 2D platformer about light and shadow",
      2023,
      "https://images.unsplash.com/photo-1511512578047-dfb367046420?w=800&h=1200&fit=crop",
      "Ember Collective",
      &["PC", "Switch"],
      &["Platformer", "Adventure"],
      &["Godot 4", "GDScript", "Aseprite"],
      false,
      "user",
      (9800, 214, 640),
    ),
    project_row(
      5,
      "Orbital Drift",
      "orbital-drift",
      "Physics-driven space combat with gravity wells",
      2024,
      "https://images.unsplash.com/photo-1446776811953-b23d57bd21aa?w=800&h=1200&fit=crop",
      "Parallax Works",
      &["PC", "Steam"],
      &["Action", "Space"],
      &["Bevy", "Rust", "Blender"],
      true,
      "admin",
      (17300, 401, 1320),
    ),
    project_row(
      6,
      "Harvest Hollow",
      "harvest-hollow",
      "Cozy farming sim with a procedurally grown village",
      2022,
      "https://images.unsplash.com/photo-1500382017468-9049fed747ef?w=800&h=1200&fit=crop",
      "Greenleaf Studio",
      &["PC", "Mobile", "Switch"],
      &["Simulation", "Cozy"],
      &["Unity", "C#"],
      false,
      "user",
      (21100, 488, 1760),
    ),
  ]
}

pub fn users() -> Result<Vec<user::Model>> {
  let now = Utc::now().naive_utc();
  let password_hash = utils::hash_password(DEMO_PASSWORD)?;
  Ok(vec![
    user::Model {
      id: "user-1".into(),
      name: "Demo User".into(),
      email: "demo@example.com".into(),
      password_hash: Some(password_hash.clone()),
      image: Some(AVATAR_A.into()),
      role: Role::User,
      verified: true,
      provider: "credentials".into(),
      created_at: now,
    },
    user::Model {
      id: "admin-1".into(),
      name: "Admin User".into(),
      email: "admin@example.com".into(),
      password_hash: Some(password_hash),
      image: Some(AVATAR_C.into()),
      role: Role::Admin,
      verified: true,
      provider: "credentials".into(),
      created_at: now,
    },
  ])
}

/// Inserts every fixture row that is not present yet.
pub async fn seed(db: &DatabaseConnection) -> Result<()> {
  for model in products() {
    if product::Entity::find_by_id(model.id.clone()).one(db).await?.is_none() {
      model.into_active_model().reset_all().insert(db).await?;
    }
  }

  for model in users()? {
    let exists = user::Entity::find()
      .filter(user::Column::Email.eq(model.email.clone()))
      .one(db)
      .await?
      .is_some();
    if !exists {
      model.into_active_model().reset_all().insert(db).await?;
    }
  }

  for model in courses() {
    if course::Entity::find_by_id(model.id.clone()).one(db).await?.is_none() {
      model.into_active_model().reset_all().insert(db).await?;
    }
  }

  for model in projects() {
    if project::Entity::find_by_id(model.id.clone()).one(db).await?.is_none() {
      model.into_active_model().reset_all().insert(db).await?;
    }
  }

  Ok(())
}

/// Replaces all courses and projects with the fixtures, then fills in
/// missing products and users.
pub async fn reseed(db: &DatabaseConnection) -> Result<()> {
  let cleared_courses = course::Entity::delete_many().exec(db).await?;
  let cleared_projects = project::Entity::delete_many().exec(db).await?;
  info!(
    "Cleared {} courses and {} projects",
    cleared_courses.rows_affected, cleared_projects.rows_affected
  );

  seed(db).await?;

  info!(
    "Seeded {} courses, {} projects, {} products",
    courses().len(),
    projects().len(),
    products().len()
  );
  Ok(())
}
