fn main() {
    std::process::exit(bcc_drv::run());
}
