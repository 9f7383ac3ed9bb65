fn main() {
    tessella::ui::app::run();
}
