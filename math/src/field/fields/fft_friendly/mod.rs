pub mod stark_32_prime_field;
