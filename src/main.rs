fn main() {
    quasi::cli::run();
}
