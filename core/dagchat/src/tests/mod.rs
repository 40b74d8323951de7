//! バイナリ全体の結合テスト（標準配線 + Runner）
