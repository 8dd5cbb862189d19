fn main() {
    lamina::cli::run();
}
