fn main() {
    pagekit::start();
}
