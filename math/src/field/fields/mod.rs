pub mod fft_friendly;
pub mod u64_prime_field;
