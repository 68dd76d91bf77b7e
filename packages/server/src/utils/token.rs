/// 32 random bytes, hex encoded. Used for email verification and password reset links.
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}
