pub mod ai;
pub mod anim;
pub mod assets;
pub mod body;
pub mod entity;
pub mod geom;
pub mod hero;
pub mod physics;
pub mod rules;
