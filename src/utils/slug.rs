use nanoid::nanoid;

/// Random slug for links created without one.
pub fn generate_slug() -> String {
    nanoid!(6)
}
