pub mod prelude;

pub mod cast_member;
pub mod country;
pub mod director;
pub mod genre;
pub mod title;
pub mod title_cast_member;
pub mod title_country;
pub mod title_director;
pub mod title_genre;
